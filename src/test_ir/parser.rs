//! TIR (Test IR) parser implementation.
//!
//! The parser is line oriented: every non-empty line is a function header,
//! a block label, an instruction or a closing brace. Value and block names
//! are checked when the function closes, callees when the module ends, so
//! forward references are allowed everywhere.

use super::*;
use crate::core::error::{AnalysisError, AnalysisResult};
use hashbrown::{HashMap, HashSet};

pub fn parse_ir(text: &str) -> AnalysisResult<TestIR> {
    let mut parser = Parser::new();
    for (idx, line) in text.lines().enumerate() {
        parser.line = idx + 1;
        parser.parse_line(line)?;
    }
    parser.finish()
}

struct Parser<'a> {
    ir: TestIR,
    line: usize,

    // Global maps
    funcs: HashMap<&'a str, u32>,
    callee_uses: Vec<Use<'a>>,

    // Per-function state
    cur_func: Option<OpenFunction<'a>>,
    cur_block: Option<OpenBlock<'a>>,
    blocks: HashSet<&'a str>,
    values: HashSet<&'a str>,
    block_uses: Vec<Use<'a>>,
    value_uses: Vec<Use<'a>>,
}

/// A name referenced before it may be defined.
#[derive(Debug)]
struct Use<'a> {
    name: &'a str,
    line: usize,
    /// Call instruction to patch, for callee uses
    value_idx: u32,
}

struct OpenFunction<'a> {
    name: &'a str,
    arg_begin_idx: u32,
    arg_end_idx: u32,
    block_begin_idx: u32,
}

struct OpenBlock<'a> {
    name: &'a str,
    inst_begin_idx: u32,
    terminated: bool,
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.')
}

/// Split a comma separated operand list, dropping empty entries.
fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|part| !part.is_empty())
}

impl<'a> Parser<'a> {
    fn new() -> Self {
        Self {
            ir: TestIR::new(),
            line: 0,
            funcs: HashMap::new(),
            callee_uses: Vec::new(),
            cur_func: None,
            cur_block: None,
            blocks: HashSet::new(),
            values: HashSet::new(),
            block_uses: Vec::new(),
            value_uses: Vec::new(),
        }
    }

    fn error(&self, msg: impl std::fmt::Display) -> AnalysisError {
        Self::error_at(self.line, msg)
    }

    fn error_at(line: usize, msg: impl std::fmt::Display) -> AnalysisError {
        AnalysisError::InvalidIr {
            reason: format!("line {}: {}", line, msg),
        }
    }

    fn parse_line(&mut self, line: &'a str) -> AnalysisResult<()> {
        let line = match line.split_once(';') {
            Some((code, _comment)) => code,
            None => line,
        }
        .trim();

        if line.is_empty() {
            return Ok(());
        }

        if self.cur_func.is_none() {
            return self.parse_function_header(line);
        }

        if line == "}" {
            return self.close_function();
        }

        if let Some(label) = line.strip_suffix(':') {
            return self.open_block(label.trim());
        }

        self.parse_instruction(line)
    }

    fn finish(mut self) -> AnalysisResult<TestIR> {
        if let Some(func) = &self.cur_func {
            return Err(self.error(format!("function '{}' is missing its closing '}}'", func.name)));
        }

        for callee in &self.callee_uses {
            let Some(&func_idx) = self.funcs.get(callee.name) else {
                return Err(Self::error_at(
                    callee.line,
                    format!("call to undefined function '{}'", callee.name),
                ));
            };
            self.ir.values[callee.value_idx as usize].callee = Some(func_idx);
        }

        Ok(self.ir)
    }

    fn read_value_name(&self, token: &'a str) -> AnalysisResult<&'a str> {
        match token.strip_prefix('%') {
            Some(name) if is_identifier(name) => Ok(name),
            _ => Err(self.error(format!("expected value name but found '{}'", token))),
        }
    }

    fn read_block_name(&self, token: &'a str) -> AnalysisResult<&'a str> {
        match token.strip_prefix('^') {
            Some(name) if is_identifier(name) => Ok(name),
            _ => Err(self.error(format!("expected block name but found '{}'", token))),
        }
    }

    fn use_value(&mut self, token: &'a str) -> AnalysisResult<()> {
        let name = self.read_value_name(token)?;
        self.value_uses.push(Use { name, line: self.line, value_idx: 0 });
        Ok(())
    }

    fn use_block(&mut self, token: &'a str) -> AnalysisResult<()> {
        let name = self.read_block_name(token)?;
        self.block_uses.push(Use { name, line: self.line, value_idx: 0 });
        Ok(())
    }

    fn parse_function_header(&mut self, line: &'a str) -> AnalysisResult<()> {
        let (name, rest) = line
            .split_once('(')
            .ok_or_else(|| self.error(format!("expected function header but found '{}'", line)))?;
        let name = name.trim();
        let (args, body) = rest
            .split_once(')')
            .ok_or_else(|| self.error("expected ')' after argument list"))?;

        if !is_identifier(name) || name.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Err(self.error(format!("invalid function name '{}'", name)));
        }
        if self.funcs.contains_key(name) {
            return Err(self.error(format!("duplicate function definition: '{}'", name)));
        }

        self.values.clear();
        self.blocks.clear();
        self.value_uses.clear();
        self.block_uses.clear();

        let arg_begin_idx = self.ir.values.len() as u32;
        for token in split_list(args) {
            let arg = self.read_value_name(token)?;
            self.push_value(arg, Operation::Arg)?;
        }
        let arg_end_idx = self.ir.values.len() as u32;

        let func_idx = self.ir.functions.len() as u32;
        self.funcs.insert(name, func_idx);

        let block_begin_idx = self.ir.blocks.len() as u32;
        match body.trim() {
            "!" => {
                self.ir.functions.push(Function {
                    name: name.to_string(),
                    declaration: true,
                    block_begin_idx,
                    block_end_idx: block_begin_idx,
                    arg_begin_idx,
                    arg_end_idx,
                });
            }
            "{" => {
                self.cur_func = Some(OpenFunction {
                    name,
                    arg_begin_idx,
                    arg_end_idx,
                    block_begin_idx,
                });
            }
            _ => {
                return Err(self.error(format!(
                    "expected '!' or '{{' after arguments of '{}'",
                    name
                )))
            }
        }

        Ok(())
    }

    fn push_value(&mut self, name: &'a str, op: Operation) -> AnalysisResult<u32> {
        let idx = self.ir.values.len() as u32;
        if !name.is_empty() && !self.values.insert(name) {
            return Err(self.error(format!("value '%{}' defined twice", name)));
        }

        self.ir.values.push(Value {
            name: name.to_string(),
            op,
            callee: None,
        });
        Ok(idx)
    }

    fn open_block(&mut self, label: &'a str) -> AnalysisResult<()> {
        if !is_identifier(label) {
            return Err(self.error(format!("invalid block label '{}'", label)));
        }
        self.close_block()?;

        if !self.blocks.insert(label) {
            return Err(self.error(format!("block '{}' defined twice", label)));
        }

        self.cur_block = Some(OpenBlock {
            name: label,
            inst_begin_idx: self.ir.values.len() as u32,
            terminated: false,
        });
        Ok(())
    }

    fn close_block(&mut self) -> AnalysisResult<()> {
        let Some(block) = self.cur_block.take() else {
            return Ok(());
        };

        if !block.terminated {
            return Err(self.error(format!("block '{}' does not end with a terminator", block.name)));
        }

        self.ir.blocks.push(Block {
            name: block.name.to_string(),
            inst_begin_idx: block.inst_begin_idx,
            inst_end_idx: self.ir.values.len() as u32,
        });
        Ok(())
    }

    fn close_function(&mut self) -> AnalysisResult<()> {
        self.close_block()?;

        let Some(func) = self.cur_func.take() else {
            return Err(self.error("unexpected '}'"));
        };

        let block_end_idx = self.ir.blocks.len() as u32;
        if block_end_idx == func.block_begin_idx {
            return Err(self.error(format!("function '{}' has no blocks", func.name)));
        }

        if let Some(value) = self.value_uses.iter().find(|u| !self.values.contains(u.name)) {
            return Err(Self::error_at(value.line, format!("undefined value '%{}'", value.name)));
        }
        if let Some(block) = self.block_uses.iter().find(|u| !self.blocks.contains(u.name)) {
            return Err(Self::error_at(block.line, format!("undefined block '^{}'", block.name)));
        }

        self.ir.functions.push(Function {
            name: func.name.to_string(),
            declaration: false,
            block_begin_idx: func.block_begin_idx,
            block_end_idx,
            arg_begin_idx: func.arg_begin_idx,
            arg_end_idx: func.arg_end_idx,
        });
        Ok(())
    }

    fn parse_instruction(&mut self, line: &'a str) -> AnalysisResult<()> {
        match &self.cur_block {
            Some(block) if block.terminated => return Err(self.error("instruction after block terminator")),
            Some(_) => {}
            None => return Err(self.error("instruction outside of a block")),
        }

        let (result, rest) = match line.strip_prefix('%').and_then(|_| line.split_once('=')) {
            Some((lhs, rhs)) => (Some(self.read_value_name(lhs.trim())?), rhs.trim()),
            None => (None, line),
        };

        let (op_name, args) = match rest.split_once(char::is_whitespace) {
            Some((op, args)) => (op, args.trim()),
            None => (rest, ""),
        };

        // `%v =` and `%v = %a, %b` define a value of unspecified operation.
        let (op, args) = if op_name.is_empty() || op_name.starts_with('%') {
            (Operation::Any, rest)
        } else {
            let op = Operation::parse(op_name)
                .ok_or_else(|| self.error(format!("unknown operation '{}'", op_name)))?;
            (op, args)
        };

        let info = op.info();
        match result {
            None if info.is_def && op != Operation::Call => {
                return Err(self.error(format!("'{}' must define a value", info.name)));
            }
            Some(name) if !info.is_def => {
                return Err(self.error(format!("'{}' cannot define '%{}'", info.name, name)));
            }
            _ => {}
        }

        let val_idx = self.push_value(result.unwrap_or(""), op)?;
        if op == Operation::Phi {
            self.parse_phi_incoming(args)?;
        } else {
            self.parse_operands(op, val_idx, args)?;
        }

        if let Some(block) = self.cur_block.as_mut() {
            block.terminated = info.is_terminator;
        }
        Ok(())
    }

    fn parse_operands(&mut self, op: Operation, val_idx: u32, args: &'a str) -> AnalysisResult<()> {
        let tokens: Vec<&'a str> = split_list(args).collect();
        let name = op.info().name;

        match op {
            Operation::Any => {
                for &token in &tokens {
                    self.use_value(token)?;
                }
            }
            Operation::Add | Operation::Sub => {
                let &[lhs, rhs] = tokens.as_slice() else {
                    return Err(self.error(format!("'{}' takes two operands", name)));
                };
                self.use_value(lhs)?;
                self.use_value(rhs)?;
            }
            Operation::Call => {
                let (&target, call_args) = tokens
                    .split_first()
                    .ok_or_else(|| self.error("call without a target"))?;
                let target = target
                    .strip_prefix('@')
                    .filter(|name| is_identifier(name))
                    .ok_or_else(|| self.error(format!("expected '@function' but found '{}'", target)))?;
                self.callee_uses.push(Use { name: target, line: self.line, value_idx: val_idx });
                for &token in call_args {
                    self.use_value(token)?;
                }
            }
            Operation::Ret => {
                if tokens.len() > 1 {
                    return Err(self.error("ret takes at most one operand"));
                }
                for &token in &tokens {
                    self.use_value(token)?;
                }
            }
            Operation::Br => {
                let &[target] = tokens.as_slice() else {
                    return Err(self.error("br takes exactly one block"));
                };
                self.use_block(target)?;
            }
            Operation::CondBr => {
                let &[cond, on_true, on_false] = tokens.as_slice() else {
                    return Err(self.error("condbr takes a condition and two blocks"));
                };
                self.use_value(cond)?;
                self.use_block(on_true)?;
                self.use_block(on_false)?;
            }
            Operation::Jump => {
                for &token in &tokens {
                    self.use_block(token)?;
                }
            }
            Operation::Terminate => {
                if !tokens.is_empty() {
                    return Err(self.error("terminate takes no operands"));
                }
            }
            Operation::Arg | Operation::Phi => unreachable!("not an operand list"),
        }
        Ok(())
    }

    /// Incoming list of a phi: `[^block, %value], ...`.
    fn parse_phi_incoming(&mut self, args: &'a str) -> AnalysisResult<()> {
        let mut incoming = 0;
        for entry in args.split(']') {
            let entry = entry.trim().trim_start_matches(',').trim();
            if entry.is_empty() {
                continue;
            }
            let pair = entry
                .strip_prefix('[')
                .ok_or_else(|| self.error(format!("expected '[' in phi but found '{}'", entry)))?;
            let (block, value) = pair
                .split_once(',')
                .ok_or_else(|| self.error("phi incoming must be [^block, %value]"))?;
            self.use_block(block.trim())?;
            self.use_value(value.trim())?;
            incoming += 1;
        }

        if incoming == 0 {
            return Err(self.error("phi has no incoming values"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_add() {
        let ir = parse_ir(
            r#"
test(%a, %b) {
entry:
  %c = add %a, %b
  ret %c
}
"#,
        )
        .unwrap();

        assert_eq!(ir.functions.len(), 1);
        let func = &ir.functions[0];
        assert_eq!(func.name, "test");
        assert!(!func.declaration);
        assert_eq!(func.arg_end_idx - func.arg_begin_idx, 2);
        assert_eq!(ir.blocks.len(), 1);
        assert_eq!(ir.values[2].op, Operation::Add);
        assert_eq!(ir.values[3].op, Operation::Ret);
    }

    #[test]
    fn test_parse_blocks_and_instructions() {
        let ir = parse_ir(
            r#"
f(%c) {
entry:
  condbr %c, ^then, ^else
then:
  br ^done
else:
  jump ^done
done:
  terminate
}
"#,
        )
        .unwrap();

        let names: Vec<_> = ir.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["entry", "then", "else", "done"]);
        assert!(ir.blocks.iter().all(|b| b.inst_end_idx - b.inst_begin_idx == 1));
    }

    #[test]
    fn test_parse_phi_forward_reference() {
        let ir = parse_ir(
            r#"
loop(%n) {
entry:
  br ^body
body:
  %i = phi [^entry, %n], [^body, %next]
  %next = sub %i, %n
  condbr %next, ^body, ^exit
exit:
  ret
}
"#,
        )
        .unwrap();

        let body = &ir.blocks[1];
        assert_eq!(body.inst_end_idx - body.inst_begin_idx, 3);
        assert_eq!(ir.values[body.inst_begin_idx as usize].op, Operation::Phi);
    }

    #[test]
    fn test_parse_call_and_declaration() {
        let ir = parse_ir(
            r#"
caller(%x) {
entry:
  %r = call @callee, %x
  call @callee, %r
  terminate
}
callee(%y)!
"#,
        )
        .unwrap();

        assert_eq!(ir.functions.len(), 2);
        assert!(ir.functions[1].declaration);
        let calls: Vec<_> = ir.values.iter().filter(|v| v.op == Operation::Call).collect();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.callee == Some(1)));
        assert!(calls[1].name.is_empty());
    }

    fn parse_err(text: &str) -> String {
        parse_ir(text).unwrap_err().to_string()
    }

    #[test]
    fn test_errors() {
        assert!(parse_err("f() {\nentry:\n  ret %x\n}\n").contains("undefined value '%x'"));
        assert!(parse_err("f() {\nentry:\n  br ^nowhere\n}\n").contains("undefined block '^nowhere'"));
        assert!(parse_err("f() {\nentry:\n  call @g\n  terminate\n}\n").contains("undefined function 'g'"));
        assert!(parse_err("f()!\nf()!\n").contains("duplicate function definition"));
        assert!(parse_err("f() {\nentry:\n  %a =\n}\n").contains("does not end with a terminator"));
        assert!(parse_err("f() {\n}\n").contains("has no blocks"));
        assert!(parse_err("f() {\nentry:\n  terminate\n").contains("missing its closing"));
        assert!(parse_err("f() {\nentry:\n  terminate\n  terminate\n}\n").contains("after block terminator"));
        assert!(parse_err("f() {\nentry:\n  %p = phi\n  terminate\n}\n").contains("no incoming values"));
        assert!(parse_err("f() {\nentry:\n  %x = mul\n  terminate\n}\n").contains("unknown operation 'mul'"));
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse_err("; header\nf() {\nentry:\n  add\n  terminate\n}\n");
        assert!(err.starts_with("Invalid IR: line 4:"), "{}", err);

        let err = parse_err("f() {\nentry:\n  ret %late\n}\n");
        assert!(err.contains("line 3:"), "{}", err);
    }
}
