//! Rejection paths of the decode pipeline

use chrono::Utc;
use compact_jwt::{
    Algorithm, AlgorithmFamily, AlgorithmSet, Claims, ErrorKind, JwtError, Segment, SigningKey,
    Validation, VerifyingKey, base64url, decode, decode_with, encode, sign,
};
use serde_json::{Value, json};

const RSA_PRIVATE: &str = include_str!("fixtures/rsa_private.pem");
const RSA_PUBLIC: &str = include_str!("fixtures/rsa_public.pem");
const RSA_OTHER_PUBLIC: &str = include_str!("fixtures/rsa_other_public.pem");
const RSA_WEAK_PRIVATE: &str = include_str!("fixtures/rsa_weak_private.pem");
const EC_P256_PRIVATE: &str = include_str!("fixtures/ec_p256_private.pem");
const EC_P384_PUBLIC: &str = include_str!("fixtures/ec_p384_public.pem");
const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

fn object(value: Value) -> Claims {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn hs256(claims: Value) -> String {
    encode(&object(claims), &SigningKey::from_secret(SECRET), Algorithm::HS256).unwrap()
}

fn hs256_rejection(token: &str) -> JwtError {
    decode(
        token,
        &VerifyingKey::from_secret(SECRET),
        &AlgorithmSet::only(Algorithm::HS256),
    )
    .unwrap_err()
}

fn swap_char(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_empty_token() {
    assert_eq!(hs256_rejection(""), JwtError::MissingToken);
}

#[test]
fn test_segment_count_guard() {
    let token = hs256(json!({"a": 1}));
    let cases = [
        (token.replacen('.', "", 2), 1),
        (token.replacen('.', "", 1), 2),
        (format!("{token}.extra"), 4),
        (format!("{token}."), 4),
        (".".repeat(5), 6),
    ];
    for (bad, count) in cases {
        assert_eq!(hs256_rejection(&bad), JwtError::MalformedToken(count), "{bad}");
    }
}

#[test]
fn test_single_character_tampering_is_detected() {
    let token = hs256(json!({"sub": "user-42", "admin": false}));
    let signing_input_len = token.rfind('.').unwrap();
    let mut signature_failures = 0;

    for index in (0..token.len()).filter(|&i| token.as_bytes()[i] != b'.') {
        let tampered = swap_char(&token, index);
        if tampered == token {
            continue;
        }
        let verifying = VerifyingKey::from_secret(SECRET);
        let kind = match decode(&tampered, &verifying, &AlgorithmSet::only(Algorithm::HS256)) {
            // Unused bits of the last symbol do not reach the signature bytes
            Ok(_) => {
                assert_eq!(index, token.len() - 1);
                continue;
            }
            Err(err) => err.kind(),
        };

        if index < signing_input_len {
            assert!(
                matches!(
                    kind,
                    ErrorKind::SignatureInvalid
                        | ErrorKind::MalformedEncoding
                        | ErrorKind::MalformedPayload
                        | ErrorKind::UnsupportedAlgorithm
                ),
                "index {index}: {kind:?}"
            );
        } else {
            assert!(
                matches!(kind, ErrorKind::SignatureInvalid | ErrorKind::MalformedEncoding),
                "index {index}: {kind:?}"
            );
        }
        if kind == ErrorKind::SignatureInvalid {
            signature_failures += 1;
        }
    }

    assert!(signature_failures > 0);
}

#[test]
fn test_claims_substitution_is_detected() {
    let genuine = hs256(json!({"sub": "user-42", "admin": false}));
    let forged_claims = base64url::encode(br#"{"sub":"user-42","admin":true}"#);

    let segments: Vec<&str> = genuine.split('.').collect();
    let forged = format!("{}.{forged_claims}.{}", segments[0], segments[2]);
    assert_eq!(hs256_rejection(&forged), JwtError::SignatureInvalid);
}

#[test]
fn test_expired_token() {
    let token = hs256(json!({"exp": Utc::now().timestamp() - 1}));
    assert_eq!(hs256_rejection(&token), JwtError::TokenExpired);
}

#[test]
fn test_not_yet_valid_token() {
    let token = hs256(json!({"nbf": Utc::now().timestamp() + 3600}));
    assert_eq!(hs256_rejection(&token), JwtError::TokenNotYetValid);
}

#[test]
fn test_non_numeric_exp_is_malformed() {
    let token = hs256(json!({"exp": "tomorrow"}));
    assert_eq!(hs256_rejection(&token).kind(), ErrorKind::MalformedPayload);
}

#[test]
fn test_wrong_key_fails_signature() {
    let signing = SigningKey::from_pem(Algorithm::RS256, RSA_PRIVATE).unwrap();
    let token = encode(&object(json!({"iss": "x"})), &signing, Algorithm::RS256).unwrap();

    let other = VerifyingKey::from_pem(Algorithm::RS256, RSA_OTHER_PUBLIC).unwrap();
    let err = decode(&token, &other, &AlgorithmSet::only(Algorithm::RS256)).unwrap_err();
    assert_eq!(err, JwtError::SignatureInvalid);

    let wrong_secret = VerifyingKey::from_secret(b"fedcba9876543210fedcba9876543210");
    let err = decode(&hs256(json!({})), &wrong_secret, &AlgorithmSet::only(Algorithm::HS256))
        .unwrap_err();
    assert_eq!(err, JwtError::SignatureInvalid);
}

#[test]
fn test_hmac_token_signed_with_public_key_is_rejected() {
    // Classic confusion: the attacker HMACs with the bytes of the public key
    let signing_input = format!(
        "{}.{}",
        base64url::encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        base64url::encode(br#"{"sub":"attacker"}"#)
    );
    let signature = sign(
        signing_input.as_bytes(),
        &SigningKey::from_secret(RSA_PUBLIC),
        Algorithm::HS256,
    )
    .unwrap();
    let token = format!("{signing_input}.{}", base64url::encode(signature));

    let public = VerifyingKey::from_pem(Algorithm::RS256, RSA_PUBLIC).unwrap();
    let err = decode(&token, &public, &AlgorithmSet::only(Algorithm::RS256)).unwrap_err();
    assert_eq!(err, JwtError::UnsupportedAlgorithm("HS256".to_string()));

    // Even a careless caller accepting everything is saved by the typed key
    let err = decode(&token, &public, &AlgorithmSet::all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}

#[test]
fn test_unregistered_algorithms() {
    for alg in ["none", "None", "HS1", "PS256", "EdDSA", ""] {
        let token = format!(
            "{}.{}.",
            base64url::encode(format!(r#"{{"alg":"{alg}"}}"#)),
            base64url::encode("{}")
        );
        assert_eq!(
            hs256_rejection(&token),
            JwtError::UnsupportedAlgorithm(alg.to_string())
        );
    }
}

#[test]
fn test_empty_accepted_set_rejects_everything() {
    let err = decode(
        &hs256(json!({})),
        &VerifyingKey::from_secret(SECRET),
        &AlgorithmSet::empty(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
}

#[test]
fn test_encoding_errors_name_the_segment() {
    let token = hs256(json!({}));
    let segments: Vec<&str> = token.split('.').collect();

    let bad_claims = format!("{}.{}*.{}", segments[0], segments[1], segments[2]);
    assert!(matches!(
        hs256_rejection(&bad_claims),
        JwtError::MalformedEncoding {
            segment: Some(Segment::Claims),
            ..
        }
    ));

    let standard_alphabet = format!("{}/.{}.{}", segments[0], segments[1], segments[2]);
    assert_eq!(
        hs256_rejection(&standard_alphabet).kind(),
        ErrorKind::MalformedEncoding
    );
}

#[test]
fn test_padded_segment_decodes_but_is_not_the_signed_text() {
    let token = hs256(json!({}));
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments[1], "e30");
    assert_eq!(base64url::decode("e30=").unwrap(), b"{}");

    let padded = format!("{}.{}=.{}", segments[0], segments[1], segments[2]);
    assert_eq!(hs256_rejection(&padded), JwtError::SignatureInvalid);
}

#[test]
fn test_payload_must_be_objects() {
    let key = SigningKey::from_secret(SECRET);
    for (header, claims) in [
        (r#"{"alg":"HS256"}"#, "[]"),
        (r#"{"alg":"HS256"}"#, "42"),
        (r#""HS256""#, "{}"),
        (r#"{"alg":"HS256"#, "{}"),
    ] {
        let input = format!("{}.{}", base64url::encode(header), base64url::encode(claims));
        let signature = sign(input.as_bytes(), &key, Algorithm::HS256).unwrap();
        let token = format!("{input}.{}", base64url::encode(signature));
        assert_eq!(
            hs256_rejection(&token).kind(),
            ErrorKind::MalformedPayload,
            "{header} {claims}"
        );
    }
}

#[test]
fn test_key_must_match_algorithm() {
    let err = SigningKey::from_pem(Algorithm::RS256, RSA_WEAK_PRIVATE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);

    let short = encode(&Claims::new(), &SigningKey::from_secret(b"short"), Algorithm::HS256);
    assert_eq!(short.unwrap_err().kind(), ErrorKind::InvalidKey);

    let es256 = SigningKey::from_pem(Algorithm::ES256, EC_P256_PRIVATE).unwrap();
    let token = encode(&Claims::new(), &es256, Algorithm::ES256).unwrap();
    let p384 = VerifyingKey::from_pem(Algorithm::ES384, EC_P384_PUBLIC).unwrap();
    let err = decode(&token, &p384, &AlgorithmSet::family(AlgorithmFamily::Ecdsa)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}

#[test]
fn test_policy_rejections() {
    let token = hs256(json!({"iss": "https://a.example", "aud": ["api"]}));
    let key = VerifyingKey::from_secret(SECRET);
    let base = Validation::new(Algorithm::HS256);

    let err = decode_with(&token, &key, &base.clone().require_claim("sub")).unwrap_err();
    assert_eq!(err, JwtError::MissingClaim("sub".to_string()));

    let err = decode_with(&token, &key, &base.clone().expect_issuer("https://b.example"))
        .unwrap_err();
    assert_eq!(err, JwtError::InvalidIssuer);

    let err = decode_with(&token, &key, &base.clone().expect_audience(["web"])).unwrap_err();
    assert_eq!(err, JwtError::InvalidAudience);

    let expired = hs256(json!({"exp": Utc::now().timestamp() - 10}));
    assert!(decode_with(&expired, &key, &base.clone().with_leeway(60)).is_ok());
    assert!(decode_with(&expired, &key, &base.validate_expiration(false)).is_ok());
}

#[test]
fn test_rsa_public_key_is_usable_for_rsa_verification() {
    // Guard against fixture drift: the confusion test above relies on this pair
    let signing = SigningKey::from_pem(Algorithm::RS256, RSA_PRIVATE).unwrap();
    let token = encode(&Claims::new(), &signing, Algorithm::RS256).unwrap();
    let public = VerifyingKey::from_pem(Algorithm::RS256, RSA_PUBLIC).unwrap();
    assert!(decode(&token, &public, &AlgorithmSet::only(Algorithm::RS256)).is_ok());
}
