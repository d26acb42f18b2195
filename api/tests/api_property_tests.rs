// Property-based tests for signed session cookies
//
// The API keeps authentication state in a signed cookie; these properties
// pin down the round trip through HTTP headers and the rejection of
// tampered or foreign-key-signed cookies.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use common::models::SessionUser;
use proptest::prelude::*;
use uuid::Uuid;

const COOKIE_NAME: &str = "microblog_session";

fn signing_key() -> Key {
    Key::derive_from(&[7u8; 64])
}

fn other_key() -> Key {
    Key::derive_from(&[9u8; 64])
}

/// Sign a session payload and return the `name=value` pair a client would
/// echo back in its Cookie header.
fn signed_cookie_pair(session: &SessionUser, key: Key) -> String {
    let cookie = Cookie::build((COOKIE_NAME, session.encode().expect("encode payload")))
        .path("/")
        .http_only(true)
        .build();

    let jar = SignedCookieJar::new(key).add(cookie);
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .expect("header is valid UTF-8");

    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

fn jar_from_pair(pair: &str, key: Key) -> SignedCookieJar {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(pair).expect("cookie header value"),
    );
    SignedCookieJar::from_headers(&headers, key)
}

// For any user identity, a session cookie round-trips through the
// Set-Cookie/Cookie headers and decodes back to the same identity.
#[test]
fn signed_session_cookie_round_trips() {
    proptest!(|(
        username in "[A-Za-z][A-Za-z0-9-]{2,29}",
        bytes in prop::array::uniform16(any::<u8>()),
    )| {
        let session = SessionUser {
            user_id: Uuid::from_bytes(bytes),
            username,
        };

        let pair = signed_cookie_pair(&session, signing_key());
        let jar = jar_from_pair(&pair, signing_key());

        let cookie = jar.get(COOKIE_NAME).expect("signature should verify");
        let decoded = SessionUser::decode(cookie.value()).expect("payload should decode");
        prop_assert_eq!(decoded, session);
    });
}

// Flipping any single character of the cookie value breaks the signature,
// so the jar treats the cookie as absent.
#[test]
fn tampered_session_cookie_is_rejected() {
    proptest!(|(
        username in "[A-Za-z][A-Za-z0-9-]{2,29}",
        bytes in prop::array::uniform16(any::<u8>()),
        position_seed in any::<usize>(),
    )| {
        let session = SessionUser {
            user_id: Uuid::from_bytes(bytes),
            username,
        };

        let pair = signed_cookie_pair(&session, signing_key());
        let value_start = pair.find('=').expect("pair separator") + 1;
        let position = value_start + position_seed % (pair.len() - value_start);

        let mut tampered: Vec<char> = pair.chars().collect();
        tampered[position] = if tampered[position] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();
        prop_assume!(tampered != pair);

        let jar = jar_from_pair(&tampered, signing_key());
        prop_assert!(jar.get(COOKIE_NAME).is_none());
    });
}

// A cookie signed with one key never verifies under another.
#[test]
fn foreign_key_signature_is_rejected() {
    proptest!(|(
        username in "[A-Za-z][A-Za-z0-9-]{2,29}",
        bytes in prop::array::uniform16(any::<u8>()),
    )| {
        let session = SessionUser {
            user_id: Uuid::from_bytes(bytes),
            username,
        };

        let pair = signed_cookie_pair(&session, signing_key());
        let jar = jar_from_pair(&pair, other_key());
        prop_assert!(jar.get(COOKIE_NAME).is_none());
    });
}
