use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use tgaprog_frame::{ChannelConfig, Ctcss};
use tgaprog_transport::PortInfo;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// The channel file shape; `read --format json` output can be written back.
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    );
}

pub fn print_channels(channels: &[ChannelConfig], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(channels),
        OutputFormat::Table => println!("{}", channel_table(channels)),
        OutputFormat::Pretty => {
            for (index, channel) in channels.iter().enumerate() {
                println!("{}", channel_line(index + 1, channel));
            }
        }
    }
}

fn channel_table(channels: &[ChannelConfig]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "CH", "RX MHz", "TX MHz", "RX CTCSS", "TX CTCSS", "BUSY LOCK", "ENCRYPT", "HOP",
        ]);
    for (index, channel) in channels.iter().enumerate() {
        table.add_row(vec![
            format!("{:02}", index + 1),
            format!("{:.5}", channel.recv_freq),
            format!("{:.5}", channel.send_freq),
            tone_label(channel.recv_ctcss),
            tone_label(channel.send_ctcss),
            yes_no(channel.busy_lock).to_string(),
            yes_no(channel.encryption).to_string(),
            yes_no(channel.frequency_hop).to_string(),
        ]);
    }
    for column in 1..=4 {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn channel_line(number: usize, channel: &ChannelConfig) -> String {
    let mut line = format!(
        "CH{number:02} rx={:.5} tx={:.5} rx_ctcss={} tx_ctcss={}",
        channel.recv_freq,
        channel.send_freq,
        tone_label(channel.recv_ctcss),
        tone_label(channel.send_ctcss),
    );
    for (set, name) in [
        (channel.busy_lock, "busy-lock"),
        (channel.encryption, "encrypt"),
        (channel.frequency_hop, "hop"),
    ] {
        if set {
            line.push(' ');
            line.push_str(name);
        }
    }
    line
}

fn tone_label(tone: Ctcss) -> String {
    if tone.is_off() || tone.is_standard() {
        tone.to_string()
    } else {
        format!("{tone}*")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "-"
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    description: Option<&'a str>,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: port.kind,
                    description: port.description.as_deref(),
                })
                .collect();
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "DESCRIPTION"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    port.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if ports.is_empty() {
                println!("no serial ports found");
            }
            for port in ports {
                match &port.description {
                    Some(description) => println!("{} ({}, {description})", port.name, port.kind),
                    None => println!("{} ({})", port.name, port.kind),
                }
            }
        }
    }
}

pub fn print_tones(tones: &[Ctcss], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(tones),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "HZ"]);
            for (index, tone) in tones.iter().enumerate() {
                table.add_row(vec![(index + 1).to_string(), tone.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let labels: Vec<String> = tones.iter().map(ToString::to_string).collect();
            println!("{}", labels.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_line_lists_set_flags() {
        let channel = ChannelConfig {
            recv_freq: 446.00625,
            send_freq: 446.00625,
            recv_ctcss: Ctcss::Tone(885),
            send_ctcss: Ctcss::Off,
            busy_lock: true,
            encryption: false,
            frequency_hop: true,
        };
        assert_eq!(
            channel_line(1, &channel),
            "CH01 rx=446.00625 tx=446.00625 rx_ctcss=88.5 tx_ctcss=OFF busy-lock hop"
        );
    }

    #[test]
    fn non_standard_tone_is_marked() {
        assert_eq!(tone_label(Ctcss::Tone(1000)), "100.0");
        assert_eq!(tone_label(Ctcss::Tone(1001)), "100.1*");
        assert_eq!(tone_label(Ctcss::Off), "OFF");
    }

    #[test]
    fn table_has_a_row_per_channel() {
        let channels = vec![ChannelConfig::default(); 16];
        let rendered = channel_table(&channels).to_string();
        assert!(rendered.contains("16"));
        assert!(rendered.contains("400.00000"));
    }
}
