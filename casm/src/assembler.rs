use crate::{
    error::{Diag, Error},
    label::Symbols,
    parser::{self, Stmt},
};

/// One statement that survived pass 1, pinned to its address and source line.
pub struct Item {
    pub line: usize,
    pub addr: u32,
    pub stmt: Stmt,
}

pub struct Output {
    pub bytes: Vec<u8>,
    pub items: Vec<Item>,
    pub symbols: Symbols,
    pub diags: Vec<Diag>,
}

/// Assemble one source text. Errors never abort the run: a bad line is
/// dropped in pass 1, an unresolvable instruction is dropped in pass 2, and
/// everything else still makes it into the output buffer.
pub fn assemble(src: &str, base: u32) -> Output {
    let mut diags = Vec::new();
    let mut symbols = Symbols::new();
    let mut items: Vec<Item> = Vec::new();

    // Pass 1: bind labels, build statements, lay out addresses. A label takes
    // the cursor value before its line's statement is accounted for; an
    // erroneous line contributes no statement and no address advance.
    let mut addr = base;
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let (label, rest) = parser::strip_label(raw);
        if let Some(name) = label {
            if symbols.insert(name.to_string(), line, addr).is_some() {
                diags.push(Diag::new(line, Error::RedefinedLabel(name.to_string())));
            }
        }
        let stmt = parser::tokenize(rest).and_then(|tokens| match tokens {
            Some(tokens) => Stmt::build(&tokens).map(Some),
            None => Ok(None),
        });
        match stmt {
            Ok(Some(stmt)) => {
                let size = stmt.size();
                items.push(Item { line, addr, stmt });
                addr += size;
            }
            Ok(None) => {}
            Err(error) => diags.push(Diag::new(line, error)),
        }
    }

    // Pass 2: the symbol table is frozen now. Resolve and encode in source
    // order; an instruction with an unresolved symbol is omitted entirely.
    let mut bytes = Vec::new();
    for item in &items {
        match item.stmt.resolve(&symbols) {
            Ok(inst) => bytes.extend(inst.encode()),
            Err(error) => diags.push(Diag::new(item.line, error)),
        }
    }

    Output {
        bytes,
        items,
        symbols,
        diags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(src: &str, base: u32) -> Output {
        let out = assemble(src, base);
        assert!(out.diags.is_empty(), "unexpected diags: {:?}", out.diags);
        out
    }

    #[test]
    fn mov_encoding() {
        let out = ok("MOV A, 5", 0xFF00_0000);
        assert_eq!(out.bytes, vec![0x03, 0x00, 0x0B, 0x03, 1, 0, 0, 0, 5, 0, 0, 0]);
    }

    #[test]
    fn backward_reference() {
        let out = ok("loop: INC A\nJMP loop", 0x1000);
        assert_eq!(out.symbols.get("loop"), Some(0x1000));
        // JMP operand resolves to the label, not to JMP's own address 0x100C
        assert_eq!(&out.bytes[16..20], &0x1000u32.to_le_bytes());
    }

    #[test]
    fn forward_reference() {
        let out = ok("JMP end\nNOP\nend: HALT", 0x1000);
        assert_eq!(out.symbols.get("end"), Some(0x1018));
        assert_eq!(&out.bytes[4..8], &0x1018u32.to_le_bytes());
    }

    #[test]
    fn label_binds_before_its_statement() {
        let out = ok("NOP\nhere: ALLOC_LONG\nafter: RET", 0x0);
        assert_eq!(out.symbols.get("here"), Some(12));
        assert_eq!(out.symbols.get("after"), Some(16));
    }

    #[test]
    fn alloc_byte_advances_by_one() {
        let out = ok("ALLOC_BYTE\nend: RET", 0x2000);
        assert_eq!(out.symbols.get("end"), Some(0x2001));
        assert_eq!(out.bytes.len(), 1 + 12);
        assert_eq!(out.bytes[0], 0);
    }

    #[test]
    fn data_directives_reserve_zeroes() {
        let out = ok("ALLOC_BYTE\nALLOC_SHORT\nALLOC_LONG", 0);
        assert_eq!(out.bytes, vec![0; 7]);
        assert_eq!(out.items.len(), 3);
    }

    #[test]
    fn comments_and_blanks_are_free() {
        let out = ok("# header\n\n  ; note\nlonely:\nNOP", 0x10);
        assert_eq!(out.symbols.get("lonely"), Some(0x10));
        assert_eq!(out.bytes.len(), 12);
    }

    #[test]
    fn unknown_mnemonic_does_not_advance() {
        let out = assemble("FROB A\nnext: NOP", 0x100);
        assert_eq!(out.diags.len(), 1);
        assert_eq!(out.diags[0].line, 1);
        assert_eq!(out.diags[0].error, Error::Mnemonic("FROB".to_string()));
        // The bad line occupies no space, so `next` still binds to the base
        assert_eq!(out.symbols.get("next"), Some(0x100));
        assert_eq!(out.bytes.len(), 12);
    }

    #[test]
    fn operand_count_reports_expected_vs_actual() {
        let out = assemble("ADD A", 0);
        assert_eq!(
            out.diags[0].error,
            Error::OperandCount {
                mnemonic: "ADD".to_string(),
                expected: 2,
                actual: 1,
            }
        );
        assert!(out.bytes.is_empty());
    }

    #[test]
    fn unresolved_symbol_omits_the_instruction() {
        let out = assemble("NOP\nJMP foo\nRET", 0);
        assert_eq!(out.diags.len(), 1);
        assert_eq!(out.diags[0].line, 2);
        assert_eq!(out.diags[0].error, Error::Symbol("foo".to_string()));
        // NOP and RET still encode; the JMP contributes zero bytes
        assert_eq!(out.bytes.len(), 24);
        assert_eq!(u16::from_le_bytes([out.bytes[12], out.bytes[13]]), 0x0061);
    }

    #[test]
    fn redefined_label_is_flagged_and_overridden() {
        let out = assemble("x: NOP\nx: RET", 0);
        assert_eq!(out.diags.len(), 1);
        assert_eq!(out.diags[0].line, 2);
        assert_eq!(out.diags[0].error, Error::RedefinedLabel("x".to_string()));
        assert_eq!(out.symbols.get("x"), Some(12));
    }

    #[test]
    fn symbols_are_case_sensitive() {
        let out = assemble("Main: NOP\nJMP main", 0);
        assert_eq!(out.diags[0].error, Error::Symbol("main".to_string()));
    }

    #[test]
    fn error_lines_keep_their_labels() {
        // The label binds even though the rest of the line is rejected
        let out = assemble("here: FROB\nJMP here", 0x40);
        assert_eq!(out.diags.len(), 1);
        assert_eq!(out.symbols.get("here"), Some(0x40));
        assert_eq!(&out.bytes[4..8], &0x40u32.to_le_bytes());
    }

    #[test]
    fn sized_and_dereferenced_operands() {
        let out = ok("MOV byte [A], short 0x10", 0);
        // op1: reg | deref | byte -> 0b1100; op2: short immediate -> 0b0001
        assert_eq!(out.bytes[2], 0x0C);
        assert_eq!(out.bytes[3], 0x01);
        assert_eq!(&out.bytes[4..8], &1u32.to_le_bytes());
        assert_eq!(&out.bytes[8..12], &0x10u32.to_le_bytes());
    }

    #[test]
    fn mnemonics_and_registers_ignore_case() {
        let a = ok("mov a, 5", 0).bytes;
        let b = ok("MOV A, 5", 0).bytes;
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_concatenated_in_source_order() {
        let out = ok("NOP\nALLOC_BYTE\nHALT", 0);
        assert_eq!(out.bytes.len(), 12 + 1 + 12);
        assert_eq!(u16::from_le_bytes([out.bytes[0], out.bytes[1]]), 0x0000);
        assert_eq!(out.bytes[12], 0);
        assert_eq!(u16::from_le_bytes([out.bytes[13], out.bytes[14]]), 0x0001);
    }

    #[test]
    fn every_line_is_attempted() {
        // One diagnostic per bad line, good lines still assemble
        let out = assemble("FROB\nMOV A\nJMP gone\nRET", 0);
        assert_eq!(out.diags.len(), 3);
        assert_eq!(out.bytes.len(), 12);
    }
}
