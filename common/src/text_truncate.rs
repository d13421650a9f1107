use alloy::primitives::Address;

/// Cuts `s` to `limit` chars, noting how many were dropped. Used to keep
/// upstream error bodies readable in logs and error messages.
pub fn truncate_with_count(s: &str, limit: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= limit {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}...({} more chars)", char_count - limit)
    }
}

/// `0xd8dA6B…A96045` style form of an address for narrow places like chart
/// titles and history listings.
pub fn shorten_address(address: &Address) -> String {
    let checksummed = address.to_checksum(None);
    format!("{}…{}", &checksummed[..8], &checksummed[checksummed.len() - 6..])
}
