mod assembler;
mod error;
mod label;
mod parser;
mod util;

use color_print::cformat;
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: String,

    /// Output file (defaults to the input name with a `.cx` extension)
    #[clap(short, long)]
    output: Option<String>,

    /// Base address the binary is loaded at
    #[clap(short, long, default_value = "0xFF000000", value_parser = parse_base)]
    base: u32,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,
}

fn parse_base(s: &str) -> Result<u32, String> {
    parser::parse_with_prefix(s).map_err(|e| format!("invalid base address `{s}`: {e}"))
}

fn main() {
    use clap::Parser;

    let args = Args::parse();

    let src = std::fs::read_to_string(&args.input)
        .expect(&cformat!("<r,s>Failed to open file</>: {}", args.input));

    let out = assembler::assemble(&src, args.base);

    let lines: Vec<&str> = src.lines().collect();
    for diag in &out.diags {
        diag.print(&args.input, &lines);
    }

    let output = args.output.unwrap_or_else(|| {
        Path::new(&args.input)
            .with_extension("cx")
            .to_string_lossy()
            .into_owned()
    });
    std::fs::write(&output, &out.bytes)
        .expect(&cformat!("<r,s>Failed to write file</>: {}", output));

    if args.dump {
        util::print_dump(&args.input, &src, &out);
    }

    if !out.diags.is_empty() {
        std::process::exit(1);
    }
}
