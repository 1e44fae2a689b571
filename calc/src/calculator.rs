
use std::io::Read;

use slrkit::lexer::*;
use slrkit::parser::*;
use slrkit::pattern;

/*
 * Program -> Program Stmt | Stmt
 * Stmt    -> E ;
 * E       -> E + T | E - T | T
 * T       -> T * F | T / F | F
 * F       -> ( E ) | num
 *
 * Operands are kept on a stack in the parse context; each
 * statement pops its value into `results`.
 */
#[derive(Debug, Default)]
pub struct Values {
    stack: Vec<i64>,
    pub results: Vec<i64>,
}

impl Values {
    fn pop(&mut self) -> Result<i64, ParseError> {
        self.stack.pop().ok_or_else(|| ParseError::Action("operand stack is empty".to_string()))
    }

    fn binary(&mut self, op: fn(i64, i64) -> Option<i64>, what: &str) -> Result<(), ParseError> {
        let b = self.pop()?;
        let a = self.pop()?;
        let value = op(a, b).ok_or_else(|| ParseError::Action(format!("{} of {} and {} failed", what, a, b)))?;
        self.stack.push(value);
        Ok(())
    }
}

pub struct Calculator {
    tokenizer: Tokenizer,
    grammar: AugmentedGrammar<Values>,
    table: ParsingTable,
}

fn binary_op(lhs: &NonTerminal, rhs: [Symbol; 3], op: fn(i64, i64) -> Option<i64>, what: &'static str) -> Production<Values> {
    Production::new(lhs, rhs).with_action(move |values: &mut Values, _: &mut Reduction| values.binary(op, what))
}

impl Calculator {
    pub fn new() -> slrkit::Result<Calculator> {
        let mut tokenizer = Tokenizer::new();

        let num = tokenizer.use_terminal("num", at_least_one_of(range_of('0', '9', Encoding::Ascii)))?;
        let plus = tokenizer.use_terminal("+", literal('+'))?;
        let minus = tokenizer.use_terminal("-", literal('-'))?;
        let times = tokenizer.use_terminal("*", literal('*'))?;
        let slash = tokenizer.use_terminal("/", literal('/'))?;
        let lpar = tokenizer.use_terminal("(", literal('('))?;
        let rpar = tokenizer.use_terminal(")", literal(')'))?;
        let semi = tokenizer.use_terminal(";", literal(';'))?;

        tokenizer.ignore_terminal(pattern!(((" " | "\t" | "\n" | "\r") +)))?;
        tokenizer.ignore_terminal(sequence([literal('#'), any_number_of(literal_except(Encoding::Ascii, ['\n']))]))?;
        tokenizer.ignore_terminal(pattern!(("/*" & (_ .. "*/"))))?;
        tokenizer.build_transitions()?;

        let program = NonTerminal::new("Program");
        let stmt = NonTerminal::new("Stmt");
        let e = NonTerminal::new("E");
        let t = NonTerminal::new("T");
        let f = NonTerminal::new("F");

        let mut grammar = AugmentedGrammar::new();
        grammar.add(Production::new(&program, [program.sym(), stmt.sym()]))?;
        grammar.add(Production::new(&program, [stmt.sym()]))?;
        grammar.add(Production::new(&stmt, [e.sym(), semi.sym()]).with_action(|values: &mut Values, _: &mut Reduction| {
            let value = values.pop()?;
            log::debug!("statement value: {}", value);
            values.results.push(value);
            Ok(())
        }))?;

        grammar.add(binary_op(&e, [e.sym(), plus.sym(), t.sym()], i64::checked_add, "sum"))?;
        grammar.add(binary_op(&e, [e.sym(), minus.sym(), t.sym()], i64::checked_sub, "difference"))?;
        grammar.add(Production::new(&e, [t.sym()]))?;
        grammar.add(binary_op(&t, [t.sym(), times.sym(), f.sym()], i64::checked_mul, "product"))?;
        grammar.add(binary_op(&t, [t.sym(), slash.sym(), f.sym()], i64::checked_div, "quotient"))?;
        grammar.add(Production::new(&t, [f.sym()]))?;
        grammar.add(Production::new(&f, [lpar.sym(), e.sym(), rpar.sym()]))?;

        let number = num.clone();
        grammar.add(Production::new(&f, [num.sym()]).with_action(move |values: &mut Values, r: &mut Reduction| {
            let value = r.take(&number)?.int(Encoding::Ascii)?;
            values.stack.push(value);
            Ok(())
        }))?;

        let table = ParsingTable::build(&grammar, tokenizer.class_count())?;
        Ok(Calculator { tokenizer, grammar, table })
    }

    pub fn table(&self) -> &ParsingTable {
        &self.table
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    // Evaluates every statement of `input`, in order.
    pub fn eval(&mut self, input: impl Read, config: LexerConfig) -> slrkit::Result<Vec<i64>> {
        let lexer = Lexer::with_config(&mut self.tokenizer, input, config);
        let mut values = Values::default();
        Parser::new(&self.table, &self.grammar, lexer).parse_input(&mut values)?;
        Ok(values.results)
    }
}
