/// Computes a stable hex fingerprint of a string.
///
/// The fingerprint is the `blake3` digest of the UTF-8 bytes of `input`,
/// hex-encoded and truncated to `len` characters (at most 64).
///
/// # Example
///
/// ```
/// use yumrepo_utils::hash::fingerprint;
///
/// let id = fingerprint("http://mirror.example.com/centos/7/os/x86_64", 12);
/// assert_eq!(id.len(), 12);
/// ```
pub fn fingerprint(input: &str, len: usize) -> String {
    let hex = blake3::hash(input.as_bytes()).to_hex();
    let len = len.min(hex.len());
    hex[..len].to_string()
}

#[cfg(test)]
mod tests {
    use super::fingerprint;

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            fingerprint("hello world\n", 64),
            "dc5a4edb8240b018124052c330270696f96771a63b45250a5c17d3000e823355"
        );
    }

    #[test]
    fn test_fingerprint_is_stable_and_truncated() {
        let a = fingerprint("file:///srv/repo", 12);
        let b = fingerprint("file:///srv/repo", 12);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_ne!(a, fingerprint("file:///srv/other", 12));
    }

    #[test]
    fn test_fingerprint_len_is_capped() {
        assert_eq!(fingerprint("x", 500).len(), 64);
    }
}
