//! Definition file loading helpers (line lexer, directive parsers, loader).

pub mod lexer;
pub mod loader;
pub mod parser;

pub use lexer::{SourceLine, SourceLines, Token, remainder_after, split_tokens};
pub use loader::{IsaLoader, LoadOptions, LoadReport};
pub use parser::{DirectiveError, parse_instruction_line, parse_operand_line};
