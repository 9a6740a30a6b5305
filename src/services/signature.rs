//! Request signing and account hashing for the payout gateway
//!
//! Both functions are pure and deterministic; the gateway recomputes the
//! signature on its side, so any drift here breaks every payout call.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Sign a gateway request.
///
/// The signature is HMAC-SHA256 over `method + path + base64(body) +
/// timestamp`, hex-encoded lowercase. An empty body contributes an empty
/// string, which matches the gateway's handling of GET requests.
pub fn sign(method: &str, path: &str, body: &str, timestamp: &str, secret: &str) -> String {
    let body_b64 = if body.is_empty() {
        String::new()
    } else {
        BASE64.encode(body.as_bytes())
    };
    let payload = format!("{}{}{}{}", method, path, body_b64, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Hash a bank account for on-chain use.
///
/// SHA-256 over `bankName + "_" + accountNumber`, hex-encoded. One-way, so
/// raw account numbers never land in public calldata.
pub fn hash_bank_account(bank_name: &str, account_number: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", bank_name, account_number).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Alphanumeric, Rng};

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_known_vector() {
        let body = r#"{"txHash":"0xabc","amountTransfer":"100000"}"#;
        let signature = sign(
            "POST",
            "/transaction/redeem-request",
            body,
            "1700000000000",
            SECRET,
        );
        assert_eq!(
            signature,
            "2e718e86e8a8b2ac375577c15b2247e882088c5f89acbf4603675b4b4286d991"
        );
    }

    #[test]
    fn test_sign_empty_body_known_vector() {
        let signature = sign(
            "GET",
            "/transaction/user/transaction-history",
            "",
            "1700000000000",
            SECRET,
        );
        assert_eq!(
            signature,
            "bf445b9b439a114125087be9979ffec2c8d730297d146f19e93e9c03895a6374"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign("POST", "/p", "body", "123", SECRET);
        let b = sign("POST", "/p", "body", "123", SECRET);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_distinct_over_randomized_inputs() {
        // Property check: varying any single input changes the signature.
        // 10,000 randomized trials, no collisions expected.
        let mut rng = rand::thread_rng();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..10_000 {
            let path: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(12)
                .map(char::from)
                .collect();
            let body: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(24)
                .map(char::from)
                .collect();
            let timestamp = rng.gen_range(1_000_000_000_000u64..2_000_000_000_000).to_string();

            let signature = sign("POST", &path, &body, &timestamp, SECRET);
            assert!(
                seen.insert((path, body, timestamp, signature)),
                "duplicate randomized input generated"
            );
        }

        let unique_signatures: std::collections::HashSet<_> =
            seen.iter().map(|(_, _, _, s)| s.clone()).collect();
        assert_eq!(unique_signatures.len(), seen.len(), "signature collision");
    }

    #[test]
    fn test_sign_single_input_changes_signature() {
        let base = sign("POST", "/p", "body", "123", SECRET);
        assert_ne!(base, sign("GET", "/p", "body", "123", SECRET));
        assert_ne!(base, sign("POST", "/q", "body", "123", SECRET));
        assert_ne!(base, sign("POST", "/p", "bodyy", "123", SECRET));
        assert_ne!(base, sign("POST", "/p", "body", "124", SECRET));
        assert_ne!(base, sign("POST", "/p", "body", "123", "other-secret"));
    }

    #[test]
    fn test_hash_bank_account_known_vector() {
        assert_eq!(
            hash_bank_account("BANK CENTRAL ASIA", "1234567890"),
            "4ca2e969cfd78c30902de20cd537d7717284555a0dbd8693b9fb508872209052"
        );
        assert_eq!(
            hash_bank_account("UNKNOWN", "0000000000"),
            "cc6f072dc8a2d108a93cae5b0e69f8db3a15bb556f1bdebf67c8732a69e7de86"
        );
    }

    #[test]
    fn test_hash_bank_account_deterministic_and_distinct() {
        let hash = hash_bank_account("BANK", "1234567890");
        assert_eq!(hash, hash_bank_account("BANK", "1234567890"));
        assert_ne!(hash, hash_bank_account("BANK", "1234567891"));
        assert_ne!(hash, hash_bank_account("OTHER", "1234567890"));
    }

    #[test]
    fn test_hash_bank_account_does_not_leak_account_number() {
        // One-wayness sanity check: the digest never contains the account
        // number, and distinct accounts over a small space never collide.
        let mut seen = std::collections::HashSet::new();
        for account in 0..10_000u32 {
            let number = format!("{:010}", account);
            let hash = hash_bank_account("BANK", &number);
            assert!(!hash.contains(&number));
            assert!(seen.insert(hash), "collision over small account space");
        }
    }
}
