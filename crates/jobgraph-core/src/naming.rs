/// `extract_data_job` becomes `ExtractDataJob`.
pub fn normalize_identifier(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for segment in identifier.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
