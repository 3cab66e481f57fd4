use std::collections::HashSet;

/// Precedence levels of the default operator set.
///
/// Higher binds tighter. These constants are the single source of truth for
/// the climbing loop; no other part of the grammar encodes precedence.
pub mod precedence {
    /// `=`
    pub const ASSIGN: u8 = 1;
    /// `=>`
    pub const LAMBDA: u8 = 2;
    /// `==`, `!=`, `<`, `>`, `<=`, `>=`
    pub const COMPARE: u8 = 3;
    /// `:`
    pub const RANGE: u8 = 4;
    /// `+`, `-`
    pub const ADDITIVE: u8 = 5;
    /// `*`, `/`
    pub const MULTIPLICATIVE: u8 = 6;
    /// Unary prefix `-`, `+`
    pub const PREFIX: u8 = 8;
    /// `^`
    pub const POWER: u8 = 9;
    /// Postfix `!`
    pub const POSTFIX: u8 = 10;
}

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// `a op b op c` folds as `(a op b) op c`.
    Left,
    /// `a op b op c` folds as `a op (b op c)`.
    Right,
}

/// Where an operator sits relative to its operands.
///
/// The same symbol may be registered at several fixities (`-` is both infix
/// subtraction and prefix negation); the parse position disambiguates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Before its single operand.
    Prefix,
    /// Between two operands.
    Infix,
    /// After its single operand.
    Postfix,
}

/// One operator definition consulted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDef {
    /// The symbol text, e.g. `"+"` or `"=>"`.
    pub symbol:          String,
    /// Binding strength; higher binds tighter.
    pub precedence:      u8,
    /// Fold direction for equal precedence.
    pub assoc:           Assoc,
    /// Operand placement.
    pub fixity:          Fixity,
    /// Whether a right-hand expression must follow. True for infix and
    /// prefix operators, false for postfix ones.
    pub expects_operand: bool,
}

impl OperatorDef {
    /// Builds an infix definition.
    #[must_use]
    pub fn infix(symbol: &str, precedence: u8, assoc: Assoc) -> Self {
        Self { symbol: symbol.to_string(),
               precedence,
               assoc,
               fixity: Fixity::Infix,
               expects_operand: true }
    }

    /// Builds a prefix definition.
    #[must_use]
    pub fn prefix(symbol: &str, precedence: u8) -> Self {
        Self { symbol: symbol.to_string(),
               precedence,
               assoc: Assoc::Right,
               fixity: Fixity::Prefix,
               expects_operand: true }
    }

    /// Builds a postfix definition.
    #[must_use]
    pub fn postfix(symbol: &str, precedence: u8) -> Self {
        Self { symbol: symbol.to_string(),
               precedence,
               assoc: Assoc::Left,
               fixity: Fixity::Postfix,
               expects_operand: false }
    }
}

/// The registry of operator definitions and reserved keywords.
///
/// The table is data, not code: the scanner longest-matches symbol text
/// against it and the parser reads precedence and associativity out of it,
/// so extensions can register new operators and keywords at run time
/// without touching either.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    definitions: Vec<OperatorDef>,
    keywords:    HashSet<String>,
}

impl OperatorTable {
    /// Creates an empty table with no operators and no keywords.
    #[must_use]
    pub fn new() -> Self {
        Self { definitions: Vec::new(),
               keywords:    HashSet::new(), }
    }

    /// Creates the default table of the language.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::operators::{Fixity, OperatorTable};
    ///
    /// let table = OperatorTable::with_defaults();
    /// let add = table.lookup("+", Fixity::Infix).unwrap();
    /// let mul = table.lookup("*", Fixity::Infix).unwrap();
    /// assert!(mul.precedence > add.precedence);
    /// ```
    #[must_use]
    pub fn with_defaults() -> Self {
        use precedence::{
            ADDITIVE, ASSIGN, COMPARE, LAMBDA, MULTIPLICATIVE, POSTFIX, POWER, PREFIX, RANGE,
        };

        let mut table = Self::new();

        table.register(OperatorDef::infix("=", ASSIGN, Assoc::Right));
        table.register(OperatorDef::infix("=>", LAMBDA, Assoc::Right));
        for symbol in ["==", "!=", "<", ">", "<=", ">="] {
            table.register(OperatorDef::infix(symbol, COMPARE, Assoc::Left));
        }
        table.register(OperatorDef::infix(":", RANGE, Assoc::Left));
        table.register(OperatorDef::infix("+", ADDITIVE, Assoc::Left));
        table.register(OperatorDef::infix("-", ADDITIVE, Assoc::Left));
        table.register(OperatorDef::infix("*", MULTIPLICATIVE, Assoc::Left));
        table.register(OperatorDef::infix("/", MULTIPLICATIVE, Assoc::Left));
        table.register(OperatorDef::prefix("-", PREFIX));
        table.register(OperatorDef::prefix("+", PREFIX));
        table.register(OperatorDef::infix("^", POWER, Assoc::Right));
        table.register(OperatorDef::postfix("!", POSTFIX));

        for keyword in ["if", "else", "while", "do", "for", "function"] {
            table.register_keyword(keyword);
        }

        table
    }

    /// Registers an operator definition.
    ///
    /// Re-registering the same `(symbol, fixity)` pair replaces the previous
    /// definition, so registration is idempotent.
    pub fn register(&mut self, def: OperatorDef) {
        if let Some(existing) = self.definitions
                                    .iter_mut()
                                    .find(|d| d.symbol == def.symbol && d.fixity == def.fixity)
        {
            *existing = def;
            return;
        }
        self.definitions.push(def);
    }

    /// Reserves a word so the scanner hands it to the parser as a keyword.
    pub fn register_keyword(&mut self, word: &str) {
        self.keywords.insert(word.to_string());
    }

    /// Tests whether a word is a registered keyword.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// Looks up a definition by symbol and fixity.
    #[must_use]
    pub fn lookup(&self, symbol: &str, fixity: Fixity) -> Option<&OperatorDef> {
        self.definitions
            .iter()
            .find(|d| d.symbol == symbol && d.fixity == fixity)
    }

    /// Looks up the infix definition of a symbol.
    #[must_use]
    pub fn infix(&self, symbol: &str) -> Option<&OperatorDef> {
        self.lookup(symbol, Fixity::Infix)
    }

    /// Looks up the prefix definition of a symbol.
    #[must_use]
    pub fn prefix(&self, symbol: &str) -> Option<&OperatorDef> {
        self.lookup(symbol, Fixity::Prefix)
    }

    /// Looks up the postfix definition of a symbol.
    #[must_use]
    pub fn postfix(&self, symbol: &str) -> Option<&OperatorDef> {
        self.lookup(symbol, Fixity::Postfix)
    }

    /// Tests whether any registered symbol starts with the character.
    #[must_use]
    pub fn is_operator_start(&self, c: char) -> bool {
        self.definitions
            .iter()
            .any(|d| d.symbol.chars().next() == Some(c))
    }

    /// Finds the longest registered symbol that matches the buffer at
    /// `start`.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::operators::OperatorTable;
    ///
    /// let table = OperatorTable::with_defaults();
    /// let chars: Vec<char> = "==3".chars().collect();
    /// assert_eq!(table.longest_match(&chars, 0).as_deref(), Some("=="));
    /// ```
    #[must_use]
    pub fn longest_match(&self, chars: &[char], start: usize) -> Option<String> {
        let mut best: Option<&str> = None;

        for def in &self.definitions {
            let symbol: Vec<char> = def.symbol.chars().collect();
            if start + symbol.len() > chars.len() {
                continue;
            }
            if chars[start..start + symbol.len()] == symbol[..]
               && best.is_none_or(|b| b.chars().count() < symbol.len())
            {
                best = Some(&def.symbol);
            }
        }

        best.map(ToString::to_string)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
