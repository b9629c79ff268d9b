use clap::{Parser, Subcommand};
use xsig::machine::{run_machine001, DeviceContext, ExecutionContext, Script, ScriptInterpreter};

/// Differential-testing front end for the xsig machine.
///
/// Prints machine-readable results on stdout. The process exits 0 whenever the
/// inputs parsed and the machine ran, even if the semantic answer is `error`
/// or `0`; it exits non-zero only for input-shape problems.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate bytecode and print `ok:<hex_stack>` or `error`.
    Eval {
        /// The program, hex encoded.
        code: String,
        /// The message bound to signature checks, hex encoded.
        msg: String,
        /// Device identifier, hex encoded, exactly 32 bytes.
        device_id: Option<String>,
    },
    /// Run the machine001 two-phase verification and print `0` or `1`.
    M001 {
        /// The policy envelope, hex encoded.
        xpubkey: String,
        /// The witness envelope, hex encoded.
        xsig: String,
        /// The message, hex encoded.
        msg: String,
        /// Device identifier, hex encoded, exactly 32 bytes.
        device_id: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let args: Args = Args::parse();
    if let Err(e) = run(args.command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Eval {
            code,
            msg,
            device_id,
        } => {
            let code = decode_hex("code", &code)?;
            let msg = decode_hex("msg", &msg)?;
            let device = device_id.as_deref().map(parse_device_id).transpose()?;

            let script = Script::from(code);
            let mut interpreter = ScriptInterpreter::new();
            let context = ExecutionContext {
                message: &msg,
                device: device.as_ref(),
            };
            match interpreter.eval_script_with_context(&script, &context) {
                Ok(()) => println!("ok:{}", hex::encode(interpreter.stack().as_slice())),
                Err(e) => {
                    log::debug!("eval failed: {}", e);
                    println!("error");
                }
            }
            Ok(())
        }
        Command::M001 {
            xpubkey,
            xsig,
            msg,
            device_id,
        } => {
            let xpubkey = decode_hex("xpubkey", &xpubkey)?;
            let xsig = decode_hex("xsig", &xsig)?;
            let msg = decode_hex("msg", &msg)?;
            let device = device_id.as_deref().map(parse_device_id).transpose()?;

            let accepted = run_machine001(&xpubkey, &xsig, &msg, device.as_ref());
            println!("{}", u8::from(accepted));
            Ok(())
        }
    }
}

fn decode_hex(what: &str, hex_str: &str) -> Result<Vec<u8>, String> {
    hex::decode(hex_str).map_err(|e| format!("bad {} hex: {}", what, e))
}

fn parse_device_id(hex_str: &str) -> Result<DeviceContext, String> {
    let bytes = decode_hex("device_id", hex_str)?;
    if bytes.len() != 32 {
        return Err("bad device_id hex (must be exactly 32 bytes)".to_string());
    }
    Ok(DeviceContext {
        device_id: bytes.into(),
    })
}
