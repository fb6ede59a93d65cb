use crate::provider::{
    LaunchAction, LaunchResult, LauncherProvider, Preview, PreviewProvider, SearchContext,
};

const CALCULATOR_ICON: &str = "accessories-calculator";
const OPERATORS: [char; 6] = ['+', '-', '*', '/', '(', ')'];
const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected '{0}' at position {1}")]
    Unexpected(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("result is not a finite number")]
    NonFinite,
    #[error("parentheses nested deeper than {0}")]
    TooDeep(usize),
}

/// Arithmetic on plain math input such as `12 * (3 + 4)`.
#[derive(Debug, Default)]
pub struct CalculatorProvider;

impl CalculatorProvider {
    fn result_for(&self, query: &str) -> Option<String> {
        if !self.can_handle(query) {
            return None;
        }
        match evaluate(query.trim()) {
            Ok(value) => Some(format_number(value)),
            Err(error) => {
                log::debug!("calculator rejected '{}': {error}", query.trim());
                None
            }
        }
    }
}

impl LauncherProvider for CalculatorProvider {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn priority(&self) -> i32 {
        200
    }

    fn can_handle(&self, query: &str) -> bool {
        let trimmed = query.trim();
        !trimmed.is_empty()
            && trimmed.chars().all(is_math_char)
            && trimmed.chars().any(|c| OPERATORS.contains(&c))
    }

    fn search(&self, query: &str, _ctx: &SearchContext<'_>) -> Vec<LaunchResult> {
        let Some(value) = self.result_for(query) else {
            return Vec::new();
        };
        let expression = query.trim();
        vec![LaunchResult {
            id: format!("calc-{expression}"),
            title: format!("{expression} = {value}"),
            subtitle: Some("Press Enter to copy result".to_string()),
            icon: CALCULATOR_ICON.to_string(),
            score: 1000,
            action: LaunchAction::CopyText(value),
        }]
    }
}

impl PreviewProvider for CalculatorProvider {
    fn preview(&self, query: &str, _ctx: &SearchContext<'_>) -> Option<Preview> {
        self.result_for(query).map(|value| Preview {
            text: format!(" = {value}"),
            icon: Some(CALCULATOR_ICON.to_string()),
        })
    }
}

fn is_math_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || OPERATORS.contains(&c) || c == '.' || c == ','
}

/// Evaluates `+ - * /` with parentheses and unary signs. Characters outside
/// the arithmetic alphabet (including `,` and whitespace) are dropped first.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens: Vec<char> = expression
        .chars()
        .filter(|c| c.is_ascii_digit() || OPERATORS.contains(c) || *c == '.')
        .collect();
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(&c) = parser.tokens.get(parser.pos) {
        return Err(CalcError::Unexpected(c, parser.pos));
    }
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(value)
}

/// Rounds to six decimal places and drops a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

struct Parser {
    tokens: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == '*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    /// Unary signs are folded iteratively so long sign runs stay flat.
    fn factor(&mut self) -> Result<f64, CalcError> {
        let mut negative = false;
        while let Some(sign @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            if sign == '-' {
                negative = !negative;
            }
        }
        let value = self.primary()?;
        Ok(if negative { -value } else { value })
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some('(') => {
                if self.depth >= MAX_NESTING {
                    return Err(CalcError::TooDeep(MAX_NESTING));
                }
                self.depth += 1;
                self.pos += 1;
                let value = self.expression()?;
                self.depth -= 1;
                match self.peek() {
                    Some(')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(c) => Err(CalcError::Unexpected(c, self.pos)),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(CalcError::Unexpected(c, self.pos)),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.tokens[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| CalcError::InvalidNumber(literal))
    }
}
