// Dump a SIM Toolkit PDU given as a hex string on the command line.
//
//   stk-dump D01A810301218082028102...          proactive command
//   stk-dump --response 810301218082...         terminal response
//   stk-dump --envelope D3078202018190...       envelope
//   stk-dump --event call 0200...               control event

use std::error::Error;
use stk::{
    decode_command, decode_control_event, decode_envelope, decode_terminal_response,
    ControlEventKind,
};

fn parse_hex(s: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err("odd number of hex digits".into());
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).map_err(Into::into))
        .collect()
}

fn usage() -> ! {
    eprintln!("usage: stk-dump [--response | --envelope | --event call|sms] <hex>");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [hex] => {
            let pdu = parse_hex(hex)?;
            println!("{:#?}", decode_command(&pdu)?);
        }
        [flag, hex] if flag == "--response" => {
            let pdu = parse_hex(hex)?;
            println!("{:#?}", decode_terminal_response(&pdu)?);
        }
        [flag, hex] if flag == "--envelope" => {
            let pdu = parse_hex(hex)?;
            println!("{:#?}", decode_envelope(&pdu)?);
        }
        [flag, kind, hex] if flag == "--event" => {
            let kind = match kind.as_str() {
                "call" => ControlEventKind::Call,
                "sms" => ControlEventKind::Sms,
                _ => usage(),
            };
            let pdu = parse_hex(hex)?;
            println!("{:#?}", decode_control_event(kind, &pdu)?);
        }
        _ => usage(),
    }
    Ok(())
}
