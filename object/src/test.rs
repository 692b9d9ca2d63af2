use super::*;

#[test]
fn write_read_round_trip() {
    let path = "test_round_trip.com";

    let object_orig = Object::new(3, vec![0x1012, 0x0005, 0x8100, 0xffff]);

    write_file(path, &object_orig).unwrap();
    let object_read = read_file(path).unwrap();

    assert_eq!(object_orig, object_read);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn header_layout_matches_the_magic_and_entry_address() {
    let mut bytes = Vec::new();
    write(&mut bytes, &Object::new(0x0002, vec![0xdead, 0xbeef])).unwrap();

    assert_eq!(&bytes[0..2], &[0x43, 0x41]);
    assert_eq!(&bytes[2..4], &[0x53, 0x4c]);
    assert_eq!(&bytes[4..6], &[0x00, 0x02]);
    assert_eq!(&bytes[6..16], &[0u8; 10]);
    assert_eq!(&bytes[16..], &[0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn bad_magic_is_rejected() {
    let bytes = vec![0u8; 16];
    let mut reader = &bytes[..];
    match read(&mut reader) {
        Err(Error::BadMagic(_)) => {}
        other => panic!("expected BadMagic, got {:?}", other),
    }
}
