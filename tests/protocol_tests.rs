//! Protocol Tests
//!
//! Credential matching, sentinel splitting, tokenization, and the
//! idle-timeout framing behavior over a real socket pair.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use cmdrelay::protocol::{read_message, split, tokenize, Credential, CREDENTIAL_LEN, SENTINEL};

// =============================================================================
// Credential Tests
// =============================================================================

#[test]
fn test_credential_wire_form_is_sixteen_bytes() {
    for secret in ["", "a", "secret", "exactly16bytes!!", "longer than sixteen bytes"] {
        assert_eq!(Credential::new(secret).as_bytes().len(), CREDENTIAL_LEN);
    }
}

#[test]
fn test_wrong_credentials_are_rejected() {
    let configured = Credential::new("secret");

    let wrong = [
        "Secret", "secret1", "secre", "123321", "", "                ",
    ];
    for candidate in wrong {
        let wire = *Credential::new(candidate).as_bytes();
        assert!(
            !configured.matches(&wire),
            "credential {candidate:?} should not match"
        );
    }
}

#[test]
fn test_matching_credential_accepted_in_all_paddings() {
    let configured = Credential::new("secret");
    assert!(configured.matches(b"secret          "));
    assert!(configured.matches(b"secret"));
}

// =============================================================================
// Splitter Tests
// =============================================================================

#[test]
fn test_split_round_trip() {
    let command = b"savefile out.bin";
    let attachment: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();

    let mut raw = command.to_vec();
    raw.extend_from_slice(SENTINEL);
    raw.extend_from_slice(&attachment);

    let (cmd, att) = split(&raw);
    assert_eq!(cmd, command);
    assert_eq!(att, Some(attachment.as_slice()));
}

#[test]
fn test_split_without_sentinel() {
    let (cmd, att) = split(b"echo no attachment here");
    assert_eq!(cmd, b"echo no attachment here");
    assert_eq!(att, None);
}

// =============================================================================
// Tokenizer Tests
// =============================================================================

#[test]
fn test_tokenizer_matches_shell_quoting() {
    assert_eq!(
        tokenize(b"echo \"a b\" c").unwrap(),
        vec!["echo", "a b", "c"]
    );
    assert_eq!(
        tokenize(b"exec ls -la '/tmp/with space'").unwrap(),
        vec!["exec", "ls", "-la", "/tmp/with space"]
    );
}

#[test]
fn test_tokenizer_rejects_unterminated_quote() {
    assert!(tokenize(b"echo \"a b").is_err());
    assert!(tokenize(b"echo 'a b").is_err());
}

// =============================================================================
// Framing Tests
// =============================================================================

/// A sender that pauses longer than the receiver's idle timeout mid-message
/// gets truncated at the pause: the first burst is the whole message.
#[test]
fn test_idle_timeout_ends_the_message() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let sender = std::thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(&[0x11; 512]).unwrap();
        stream.flush().unwrap();
        std::thread::sleep(Duration::from_millis(1000));
        let _ = stream.write_all(&[0x22; 512]);
    });

    let (mut conn, _) = listener.accept().unwrap();
    conn.set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();

    let message = read_message(&mut conn, 100 * 1024, 1024).unwrap();
    assert_eq!(message, vec![0x11; 512]);

    sender.join().unwrap();
}

/// Peer close ends the message without waiting out the timeout.
#[test]
fn test_peer_close_ends_the_message() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let sender = std::thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(b"helloworld").unwrap();
        // stream drops here, closing the connection
    });

    let (mut conn, _) = listener.accept().unwrap();
    conn.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let message = read_message(&mut conn, 100 * 1024, 1024).unwrap();
    assert_eq!(message, b"helloworld");

    sender.join().unwrap();
}

/// The byte ceiling caps message assembly.
#[test]
fn test_byte_budget_caps_the_message() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let sender = std::thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(&vec![0x33; 8192]).unwrap();
    });

    let (mut conn, _) = listener.accept().unwrap();
    conn.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let message = read_message(&mut conn, 2048, 1024).unwrap();
    assert_eq!(message.len(), 2048);

    sender.join().unwrap();
}
