/// Word-sum checksum used for both the packet header and the packet data.
///
/// The input is read as little-endian 16-bit words. Every complete word except
/// the last one is summed and the total is masked to 16 bits. A dangling odd
/// byte is never padded into a word, and inputs shorter than two complete
/// words sum to zero. Recorders downstream expect exactly this value, so it is
/// not a one's-complement checksum and must not be turned into one.
pub fn checksum(bytes: &[u8]) -> u16 {
    let words = bytes.len() / 2;

    bytes
        .chunks_exact(2)
        .take(words.saturating_sub(1))
        .map(|word| u16::from_le_bytes([word[0], word[1]]))
        .fold(0u16, |sum, word| sum.wrapping_add(word))
}
