//! Static function signatures and function-name resolution.

use std::fmt;

use xqlib_foundation::{Error, Result, Sequence, SequenceType};

/// Namespace of the standard function library (`fn:`).
pub const FN_NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions";

/// Namespace of the math function library (`math:`).
pub const MATH_NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions/math";

/// A resolved function name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionName {
    /// The conventional prefix of the namespace (`fn` or `math`).
    pub prefix: &'static str,
    /// The local part of the name.
    pub local: String,
}

impl FunctionName {
    /// Resolves a lexical function name.
    ///
    /// Accepts `fn:abs`, `abs` (the default function namespace), `math:pi`
    /// and EQNames such as `Q{http://www.w3.org/2005/xpath-functions}abs`.
    /// Returns `None` for names outside the fn and math namespaces.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let (prefix, local) = if let Some(rest) = name.strip_prefix("Q{") {
            let (uri, local) = rest.split_once('}')?;
            let prefix = match uri {
                FN_NAMESPACE => "fn",
                MATH_NAMESPACE => "math",
                _ => return None,
            };
            (prefix, local)
        } else {
            match name.split_once(':') {
                Some(("fn", local)) => ("fn", local),
                Some(("math", local)) => ("math", local),
                Some(_) => return None,
                None => ("fn", name),
            }
        };

        if local.is_empty() || local.contains([':', '{', '}']) {
            return None;
        }
        Some(Self {
            prefix,
            local: local.to_string(),
        })
    }

    /// Returns the prefixed form, e.g. `fn:abs`.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.prefix, self.local)
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

/// A declared function parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, without the `$`.
    pub name: &'static str,
    /// Declared sequence type.
    pub ty: SequenceType,
}

/// The static signature of a built-in function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Qualified name, e.g. `fn:abs`.
    pub name: &'static str,
    /// Declared parameters.
    pub params: Vec<Param>,
    /// Whether the last parameter repeats (`fn:concat`).
    pub variadic: bool,
    /// Declared return type.
    pub returns: SequenceType,
    /// One-line description.
    pub description: &'static str,
}

impl Signature {
    /// Starts a signature with no parameters returning `item()*`.
    #[must_use]
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
            variadic: false,
            returns: SequenceType::any(),
            description,
        }
    }

    /// Builder method to add a parameter.
    #[must_use]
    pub fn param(mut self, name: &'static str, ty: SequenceType) -> Self {
        self.params.push(Param { name, ty });
        self
    }

    /// Builder method to make the last parameter repeat.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Builder method to set the return type.
    #[must_use]
    pub fn returns(mut self, ty: SequenceType) -> Self {
        self.returns = ty;
        self
    }

    /// The declared arity (the minimum arity for variadic signatures).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns true if a call with `count` arguments matches this signature.
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Returns the declared type of the argument at `index`.
    #[must_use]
    pub fn param_type(&self, index: usize) -> Option<SequenceType> {
        match self.params.get(index) {
            Some(param) => Some(param.ty),
            None if self.variadic => self.params.last().map(|param| param.ty),
            None => None,
        }
    }

    /// Checks every argument against its declared type.
    ///
    /// A mismatched occurrence or item type fails with `XPTY0004`.
    pub fn check_args(&self, args: &[Sequence]) -> Result<()> {
        for (index, arg) in args.iter().enumerate() {
            let Some(expected) = self.param_type(index) else {
                return Err(Error::internal(format!(
                    "{} has no parameter at position {}",
                    self.name,
                    index + 1
                )));
            };
            if !expected.accepts(arg) {
                return Err(Error::argument_mismatch(&expected, describe(arg)));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "${} as {}", param.name, param.ty)?;
        }
        if self.variadic {
            write!(f, ", ...")?;
        }
        write!(f, ") as {}", self.returns)
    }
}

/// Describes the dynamic type of a sequence for error messages.
#[must_use]
pub fn describe(seq: &Sequence) -> String {
    match seq.len() {
        0 => "empty-sequence()".to_string(),
        1 => seq
            .first()
            .map_or_else(String::new, |item| item.item_type().to_string()),
        n => {
            let first = seq
                .first()
                .map_or_else(String::new, |item| item.item_type().to_string());
            format!("sequence of {n} items starting with {first}")
        }
    }
}
