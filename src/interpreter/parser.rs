/// The parser driver: precedence climbing, statements, error recovery.
pub mod core;
/// Keyword-led constructs: `if`, `while`, `do`/`while`, `for`, `function`.
pub mod keyword;
/// Primary expressions: literals, symbols, call/index chains, brackets,
/// matrix literals, blocks and prefix operators.
pub mod primary;
