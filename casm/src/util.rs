use color_print::cformat;

use crate::assembler::Output;

/// Print an address / record / statement listing of the assembled program,
/// followed by the symbol table.
pub fn print_dump(file: &str, src: &str, out: &Output) {
    println!("----------[{}]----------", file);

    let mut items = out.items.iter().peekable();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        match items.next_if(|item| item.line == line) {
            Some(item) => {
                let (record, stmt) = match item.stmt.resolve(&out.symbols) {
                    Ok(inst) => (hex_record(&inst.encode()), inst.cformat()),
                    Err(_) => (
                        cformat!("<red,bold>!! unresolved !!</>"),
                        raw.trim().to_string(),
                    ),
                };
                let addr = cformat!("<green>{:08X}</>", item.addr);
                println!("{} {:<35} | {:>4}: {}", addr, record, line, stmt);
            }
            None => println!("{} | {:>4}: {}", " ".repeat(44), line, raw),
        }
    }

    println!("  {} symbols:", out.symbols.len());
    for (name, addr) in out.symbols.iter() {
        println!("{}", cformat!("  <green>{:08X}</> {}", addr, name));
    }
}

fn hex_record(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
