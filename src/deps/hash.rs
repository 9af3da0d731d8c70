//! Dependency fingerprinting.
//!
//! The fingerprint is the lowercase hex MD5 digest of the rendered
//! requirements, fed to the hasher one after another with no separator. It is
//! a change detector, not an integrity check: any edit to the requirement
//! list, including reordering, produces a new fingerprint.

use md5::{Digest, Md5};

use crate::requirements::Requirement;

/// Computes the fingerprint of a token sequence.
///
/// Tokens are concatenated with no separator, so sequences that only differ
/// in where one token ends and the next begins (`["x/ab@1", "c/d@2"]` and
/// `["x/ab@1c/d", "@2"]`) share a fingerprint. The format is kept so records
/// written by earlier rbuild releases stay valid. Such a collision needs a
/// requirement list that changes in step with its own line boundaries, which
/// whitespace-separated requirement lines do not produce in practice.
///
/// # Examples
///
/// ```rust
/// use rbuild::deps::compute_hash;
///
/// let empty = compute_hash(Vec::<String>::new());
/// assert_eq!(empty, "d41d8cd98f00b204e9800998ecf8427e");
/// ```
pub fn compute_hash<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Md5::new();
    for token in tokens {
        hasher.update(token.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint of an expanded requirement list.
///
/// Each requirement contributes its tokens joined by single spaces.
pub fn requirements_hash(requirements: &[Requirement]) -> String {
    compute_hash(requirements.iter().map(ToString::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(line: &str) -> Requirement {
        Requirement::from_tokens(line.split_whitespace().map(str::to_string).collect()).unwrap()
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(compute_hash(Vec::<&str>::new()), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(compute_hash(["abc"]), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_tokens_concatenated_without_separator() {
        assert_eq!(compute_hash(["a", "bc"]), compute_hash(["abc"]));
        assert_eq!(compute_hash(["x/ab@1", "c/d@2"]), compute_hash(["x/ab@1c/d", "@2"]));
        assert_ne!(compute_hash(["x/ab@1", "c/d@2"]), compute_hash(["c/d@2", "x/ab@1"]));
    }

    #[test]
    fn test_order_sensitive() {
        let forward = requirements_hash(&[req("a/one@1"), req("b/two@2")]);
        let reversed = requirements_hash(&[req("b/two@2"), req("a/one@1")]);
        assert_ne!(forward, reversed);
        assert_eq!(forward, requirements_hash(&[req("a/one@1"), req("b/two@2")]));
        assert_eq!(forward.len(), 32);
    }

    #[test]
    fn test_requirement_rendered_with_spaces() {
        assert_eq!(requirements_hash(&[req("pfultz2/half@1.12.0 -X header")]), compute_hash(["pfultz2/half@1.12.0 -X header"]));
    }
}
