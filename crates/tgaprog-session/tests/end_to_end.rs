use tgaprog_frame::{from_hex, slot_offset, ChannelConfig, Ctcss, CHANNEL_COUNT, SLOT_COUNT};
use tgaprog_session::{
    read_channels, write_channels, ErrorKind, Phase, SessionConfig, PROGRAM_MODE_REPLY,
    WAKE_SEQUENCE,
};
use tgaprog_transport::{ScriptedTransport, Transport};

/// Records captured from a radio, slots 0 to 3.
const CAPTURED: [&str; 4] = [
    "5700000D318DA802318DA8028508FFFF6A",
    "57000D0D10199D02F0069302FFFF7006CB",
    "57001A0D983A7102983A710200100010EB",
    "5700270D7AD0C1029A71C9020325FFFFEA",
];

const TRAILING_16: &str = "5700D00D0011223344556677889900AA55";
const TRAILING_17: &str = "5700DD0DFFEEDDCCBBAA998877665544C3";

fn handshake_replies() -> Vec<Vec<u8>> {
    vec![
        vec![0x06],
        PROGRAM_MODE_REPLY.to_vec(),
        vec![0x06],
        b"TGA1-01".to_vec(),
        vec![0x06],
    ]
}

/// A blank slot: 400 MHz simplex, no tones, no options.
fn blank_record(slot: usize) -> Vec<u8> {
    let mut record = from_hex("5700000D005A6202005A6202FFFFFFFFEB").unwrap();
    record[2] = slot_offset(slot);
    record
}

fn device_table() -> Vec<Vec<u8>> {
    let mut replies: Vec<Vec<u8>> = CAPTURED.iter().map(|hex| from_hex(hex).unwrap()).collect();
    replies.extend((CAPTURED.len()..CHANNEL_COUNT).map(blank_record));
    replies.push(from_hex(TRAILING_16).unwrap());
    replies.push(from_hex(TRAILING_17).unwrap());
    replies
}

fn connector(
    probe: &ScriptedTransport,
) -> impl Fn(&str) -> tgaprog_transport::Result<ScriptedTransport> + '_ {
    move |_: &str| Ok(probe.clone())
}

fn assert_mhz(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected} MHz, got {actual}"
    );
}

#[test]
fn read_decodes_captured_table() {
    let probe = ScriptedTransport::new(handshake_replies());
    probe.push_replies(device_table());

    let table = read_channels(&connector(&probe), "/dev/ttyUSB0", &SessionConfig::default())
        .expect("read should succeed");
    let channels = table.channels();

    assert_mhz(channels[0].recv_freq, 446.00625);
    assert_mhz(channels[0].send_freq, 446.00625);
    assert_eq!(channels[0].recv_ctcss, Ctcss::Tone(885));
    assert_eq!(channels[0].send_ctcss, Ctcss::Off);
    assert!(channels[0].busy_lock && !channels[0].encryption && channels[0].frequency_hop);

    assert_mhz(channels[1].recv_freq, 438.5);
    assert_mhz(channels[1].send_freq, 431.9);
    assert_eq!(channels[1].recv_ctcss, Ctcss::Off);
    assert_eq!(channels[1].send_ctcss, Ctcss::Tone(670));
    assert!(!channels[1].busy_lock && channels[1].encryption && !channels[1].frequency_hop);

    assert_mhz(channels[2].recv_freq, 409.75);
    assert_eq!(channels[2].recv_ctcss, Ctcss::Tone(1000));
    assert_eq!(channels[2].send_ctcss, Ctcss::Tone(1000));
    assert_eq!(channels[2].flags(), Default::default());

    assert_mhz(channels[3].recv_freq, 462.5625);
    assert_mhz(channels[3].send_freq, 467.5625);
    assert_eq!(channels[3].recv_ctcss, Ctcss::Tone(2503));
    assert!(channels[3].busy_lock && !channels[3].frequency_hop);

    for channel in &channels[CAPTURED.len()..] {
        assert_eq!(*channel, ChannelConfig::simplex(400.0));
    }

    let sent = probe.sent();
    assert_eq!(sent[0], WAKE_SEQUENCE.to_vec());
    assert_eq!(sent.len(), 5 + SLOT_COUNT);
    assert!(probe.is_closed());
}

#[test]
fn read_then_write_echoes_captured_records() {
    let read_probe = ScriptedTransport::new(handshake_replies());
    read_probe.push_replies(device_table());
    let table = read_channels(&connector(&read_probe), "/dev/ttyUSB0", &SessionConfig::default())
        .expect("read should succeed");
    let (channels, trailing) = table.into_parts();

    let write_probe = ScriptedTransport::new(handshake_replies());
    write_probe.push_replies(vec![vec![0x06]; SLOT_COUNT]);
    write_channels(
        &connector(&write_probe),
        "/dev/ttyUSB0",
        &channels,
        Some(&trailing),
        &SessionConfig::default(),
    )
    .expect("write should succeed");

    let sent = write_probe.sent();
    assert_eq!(sent.len(), 5 + SLOT_COUNT);
    assert_eq!(&sent[5..], device_table().as_slice());
    assert!(write_probe.is_closed());
}

#[test]
fn edited_channel_is_written_in_place() {
    let read_probe = ScriptedTransport::new(handshake_replies());
    read_probe.push_replies(device_table());
    let (mut channels, trailing) =
        read_channels(&connector(&read_probe), "/dev/ttyUSB0", &SessionConfig::default())
            .expect("read should succeed")
            .into_parts();

    channels[5] = ChannelConfig {
        recv_freq: 446.00625,
        send_freq: 400.0,
        recv_ctcss: Ctcss::Tone(885),
        send_ctcss: Ctcss::Off,
        busy_lock: true,
        encryption: false,
        frequency_hop: true,
    };

    let write_probe = ScriptedTransport::new(handshake_replies());
    write_probe.push_replies(vec![vec![0x06]; SLOT_COUNT]);
    write_channels(
        &connector(&write_probe),
        "/dev/ttyUSB0",
        &channels,
        Some(&trailing),
        &SessionConfig::default(),
    )
    .expect("write should succeed");

    let sent = write_probe.sent();
    assert_eq!(
        sent[5 + 5],
        from_hex("570041 0D 318DA802 005A6202 8508FFFF 6A").unwrap()
    );
    assert_eq!(sent[5 + 4], blank_record(4));
}

#[test]
fn rejected_record_aborts_write() {
    let read_probe = ScriptedTransport::new(handshake_replies());
    read_probe.push_replies(device_table());
    let (channels, trailing) =
        read_channels(&connector(&read_probe), "/dev/ttyUSB0", &SessionConfig::default())
            .expect("read should succeed")
            .into_parts();

    let write_probe = ScriptedTransport::new(handshake_replies());
    let mut replies = vec![vec![0x06]; SLOT_COUNT];
    replies[16] = vec![0x15];
    write_probe.push_replies(replies);

    let failure = write_channels(
        &connector(&write_probe),
        "/dev/ttyUSB0",
        &channels,
        Some(&trailing),
        &SessionConfig::default(),
    )
    .unwrap_err();

    assert_eq!(failure.phase, Phase::Write);
    assert_eq!(failure.kind(), ErrorKind::WriteRejected);
    assert_eq!(write_probe.send_count(), 5 + 17);
    assert!(write_probe.is_closed());
}
