//! Recursive-descent parser from script text to a resolved program.
//!
//! A script is one call to the entry method whose brace body is the
//! program. Each call resolves its method and arguments against the
//! registry as it is read (one character of lookahead, no
//! backtracking), lowering literal arguments and omitted defaults into
//! automatic slots bracketed by synthetic assign and clear calls.
//! `INCLUDE "file"` recursively parses a complete script sharing the
//! same registry and splices its program in place.

use std::fs;
use std::path::PathBuf;

use tracing::debug;
use zenith_methods::{CallResolver, Registry, ENTRY_METHOD};
use zenith_workspace::{Agenda, Group, Invocation, MethodId, Value, WsvId};

use crate::error::{ParseError, ParseErrorKind};
use crate::source::SourceText;

mod literal;

use literal::LiteralReader;

const MAX_INCLUDE_DEPTH: usize = 100;

/// One parse pass over one script file.
///
/// The registry is shared mutably with nested (include) parsers, so
/// variables and specializations added by an included file stay
/// visible to the enclosing parse.
#[derive(Debug)]
pub struct Parser<'a> {
    src: SourceText,
    registry: &'a mut Registry,
    include_dirs: &'a [PathBuf],
    depth: usize,
}

/// Resolved slot ids of one call, plus the literal lowering it needs.
#[derive(Debug, Default)]
struct ParsedArgs {
    outputs: Vec<WsvId>,
    inputs: Vec<WsvId>,
    /// Literal carried directly by an assign-method call.
    value: Option<Value>,
    /// Automatic slots to assign before and clear after the call.
    lowered: Vec<(WsvId, Value)>,
}

/// What the cursor found at one argument position.
enum Arg {
    Name(String),
    /// A literal starts here; the group-directed reader takes over.
    Literal,
    /// `,` or `)` immediately: the position was left empty.
    Omitted,
}

impl<'a> Parser<'a> {
    pub fn new(src: SourceText, registry: &'a mut Registry, include_dirs: &'a [PathBuf]) -> Self {
        Self {
            src,
            registry,
            include_dirs,
            depth: 0,
        }
    }

    /// Parses the whole script into its program. End of text is legal
    /// only after the entry body's closing brace.
    pub fn parse(mut self) -> Result<Agenda, ParseError> {
        self.src.eat_whitespace();
        let start = self.src.position();
        let name = self.read_name()?;
        if name != ENTRY_METHOD {
            return Err(ParseError::at(
                ParseErrorKind::Malformed,
                &self.src,
                start,
                format!("the outermost call must be {ENTRY_METHOD}"),
            ));
        }
        if self.registry.methods.lookup(ENTRY_METHOD).is_none() {
            return Err(ParseError::new(
                ParseErrorKind::UnknownMethod,
                &self.src,
                format!("the {ENTRY_METHOD} entry method is not registered"),
            ));
        }
        self.src.eat_whitespace();
        match self.src.current() {
            Some('{') => self.src.advance(),
            Some(c) => {
                return Err(ParseError::unexpected_char(
                    &self.src,
                    c,
                    "(expected '{' to open the program)",
                ))
            }
            None => {
                return Err(ParseError::unexpected_eot(
                    &self.src,
                    "(expected '{' to open the program)",
                ))
            }
        }
        let mut agenda = Agenda::new("main");
        self.parse_body(&mut agenda)?;
        self.src.eat_whitespace();
        if let Some(c) = self.src.current() {
            return Err(ParseError::unexpected_char(
                &self.src,
                c,
                "after the program's closing brace",
            ));
        }
        debug!(
            file = %self.src.path().display(),
            invocations = agenda.len(),
            "parsed control script"
        );
        Ok(agenda)
    }

    /// Calls until the closing `}` of the current body.
    fn parse_body(&mut self, agenda: &mut Agenda) -> Result<(), ParseError> {
        loop {
            self.src.eat_whitespace();
            match self.src.current() {
                Some('}') => {
                    self.src.advance();
                    return Ok(());
                }
                Some(_) => self.parse_call(agenda)?,
                None => {
                    return Err(ParseError::unexpected_eot(
                        &self.src,
                        "inside a program body (missing '}')",
                    ))
                }
            }
        }
    }

    fn parse_call(&mut self, agenda: &mut Agenda) -> Result<(), ParseError> {
        let start = self.src.position();
        let name = self.read_name()?;
        if name == "INCLUDE" {
            return self.parse_include(agenda);
        }
        let Some(method) = self.registry.methods.lookup(&name) else {
            return Err(ParseError::at(
                ParseErrorKind::UnknownMethod,
                &self.src,
                start,
                format!("unknown method: {name}"),
            ));
        };
        let mut resolver = CallResolver::new(&self.registry.methods, method);

        self.src.eat_whitespace();
        let args = if self.src.current() == Some('(') {
            self.src.advance();
            self.parse_argument_list(&mut resolver)?
        } else {
            self.default_arguments(&mut resolver)?
        };

        let base = resolver.base().to_string();
        let program_valued = resolver.record(&self.registry.methods).program_valued;
        let resolved = resolver
            .finish(&self.registry.methods)
            .map_err(|e| ParseError::from_resolve(&self.src, e))?;

        self.src.eat_whitespace();
        let nested = if self.src.current() == Some('{') {
            if !program_valued {
                return Err(ParseError::malformed(
                    &self.src,
                    format!("{base} does not take a program body"),
                ));
            }
            self.src.advance();
            let nested_name = args
                .outputs
                .first()
                .map(|id| self.registry.variables.name(*id).to_string())
                .unwrap_or_else(|| base.clone());
            let mut body = Agenda::new(nested_name);
            self.parse_body(&mut body)?;
            Some(body)
        } else if program_valued {
            return Err(ParseError::malformed(
                &self.src,
                format!("{base} requires a program body in braces"),
            ));
        } else {
            None
        };

        self.assemble(agenda, resolved, args, nested)
    }

    /// The four argument sections in declared order: specific outputs,
    /// generic outputs, specific inputs, generic inputs. One flat
    /// comma-separated list at the call site.
    fn parse_argument_list(
        &mut self,
        resolver: &mut CallResolver,
    ) -> Result<ParsedArgs, ParseError> {
        let mut args = ParsedArgs::default();
        let mut first = true;

        let outs = resolver.record(&self.registry.methods).outputs.len();
        for w in 0..outs {
            match self.next_argument(&mut first)? {
                Arg::Name(name) => {
                    let id = resolver
                        .specific_output(self.registry, w, &name)
                        .map_err(|e| ParseError::from_resolve(&self.src, e))?;
                    args.outputs.push(id);
                }
                Arg::Literal => return Err(self.constant_output(resolver)),
                Arg::Omitted => return Err(self.missing_argument(resolver)),
            }
        }

        let gouts = resolver.record(&self.registry.methods).gouts.len();
        for g in 0..gouts {
            match self.next_argument(&mut first)? {
                Arg::Name(name) => {
                    let id = resolver
                        .generic_output(self.registry, g, &name)
                        .map_err(|e| ParseError::from_resolve(&self.src, e))?;
                    args.outputs.push(id);
                }
                Arg::Literal => return Err(self.constant_output(resolver)),
                Arg::Omitted => return Err(self.missing_argument(resolver)),
            }
        }

        let ins = resolver.record(&self.registry.methods).inputs.len();
        for w in 0..ins {
            match self.next_argument(&mut first)? {
                Arg::Name(name) => {
                    let id = resolver
                        .specific_input(self.registry, w, &name)
                        .map_err(|e| ParseError::from_resolve(&self.src, e))?;
                    args.inputs.push(id);
                }
                Arg::Literal => {
                    let declared = {
                        let record = resolver.record(&self.registry.methods);
                        self.registry.variables.name(record.inputs[w]).to_string()
                    };
                    let group = resolver.specific_input_group(self.registry, w);
                    let value = self.read_literal_value(group)?;
                    let auto = format!("auto_{}_{}", resolver.base(), declared);
                    self.lower_into(&mut args, &auto, value)?;
                }
                Arg::Omitted => return Err(self.missing_argument(resolver)),
            }
        }

        let gins = resolver.record(&self.registry.methods).gins.len();
        let assign = resolver.record(&self.registry.methods).assign;
        for j in 0..gins {
            let gin_name = resolver.record(&self.registry.methods).gins[j].clone();
            match self.next_argument(&mut first)? {
                Arg::Name(name) => {
                    if assign {
                        return Err(ParseError::malformed(
                            &self.src,
                            format!(
                                "{} takes a literal value, not a variable name",
                                resolver.base()
                            ),
                        ));
                    }
                    let id = resolver
                        .generic_input(self.registry, j, &name)
                        .map_err(|e| ParseError::from_resolve(&self.src, e))?;
                    args.inputs.push(id);
                }
                Arg::Literal => {
                    let value = self.read_gin_literal(resolver, j)?;
                    self.lower_gin(resolver, &mut args, j, &gin_name, value, assign)?;
                }
                Arg::Omitted => {
                    let default = resolver.record(&self.registry.methods).gin_defaults[j].clone();
                    let Some(text) = default else {
                        return Err(ParseError::malformed(
                            &self.src,
                            format!(
                                "{}: {} has no default value, must be specified",
                                resolver.base(),
                                gin_name
                            ),
                        ));
                    };
                    let value = self.parse_gin_default(resolver, j, &gin_name, &text)?;
                    self.lower_gin(resolver, &mut args, j, &gin_name, value, assign)?;
                }
            }
        }

        self.src.eat_whitespace();
        match self.src.current() {
            Some(')') => {
                self.src.advance();
                Ok(args)
            }
            Some(',') => Err(ParseError::malformed(
                &self.src,
                format!("too many arguments to {}", resolver.base()),
            )),
            Some(c) => Err(ParseError::unexpected_char(&self.src, c, "(expected ')')")),
            None => Err(ParseError::unexpected_eot(&self.src, "inside an argument list")),
        }
    }

    /// A call without parentheses: every specific slot defaults to its
    /// declared variable and every generic input to its default
    /// literal.
    fn default_arguments(&mut self, resolver: &mut CallResolver) -> Result<ParsedArgs, ParseError> {
        let record = resolver.record(&self.registry.methods);
        if !record.gouts.is_empty() {
            return Err(ParseError::malformed(
                &self.src,
                format!(
                    "{} needs its generic outputs supplied in parentheses",
                    resolver.base()
                ),
            ));
        }
        let assign = record.assign;
        let outputs = record.outputs.clone();
        let inputs = record.inputs.clone();
        let gin_names = record.gins.clone();
        let gin_defaults = record.gin_defaults.clone();

        let mut args = ParsedArgs {
            outputs,
            inputs,
            ..ParsedArgs::default()
        };
        for (j, (gin_name, default)) in gin_names.iter().zip(gin_defaults).enumerate() {
            let Some(text) = default else {
                return Err(ParseError::malformed(
                    &self.src,
                    format!(
                        "{}: {} has no default value, must be specified",
                        resolver.base(),
                        gin_name
                    ),
                ));
            };
            let value = self.parse_gin_default(resolver, j, gin_name, &text)?;
            self.lower_gin(resolver, &mut args, j, gin_name, value, assign)?;
        }
        Ok(args)
    }

    /// Separator discipline for one argument position. The first
    /// argument takes no comma; later ones require it. A `,` or `)`
    /// where the argument itself would start marks the position
    /// omitted (the separator is left for the next position).
    fn next_argument(&mut self, first: &mut bool) -> Result<Arg, ParseError> {
        self.src.eat_whitespace();
        if !*first {
            match self.src.current() {
                Some(',') => {
                    self.src.advance();
                    self.src.eat_whitespace();
                }
                Some(')') => return Ok(Arg::Omitted),
                Some(c) => {
                    return Err(ParseError::unexpected_char(
                        &self.src,
                        c,
                        "between arguments (expected ',')",
                    ))
                }
                None => {
                    return Err(ParseError::unexpected_eot(&self.src, "inside an argument list"))
                }
            }
        }
        *first = false;
        match self.src.current() {
            Some(',') | Some(')') => Ok(Arg::Omitted),
            Some(c) if c.is_ascii_alphabetic() => Ok(Arg::Name(self.read_name()?)),
            Some('"' | '[' | '+' | '-' | '.') | Some('0'..='9') => Ok(Arg::Literal),
            Some(c) => Err(ParseError::unexpected_char(&self.src, c, "in an argument list")),
            None => Err(ParseError::unexpected_eot(&self.src, "inside an argument list")),
        }
    }

    fn read_gin_literal(&mut self, resolver: &CallResolver, j: usize) -> Result<Value, ParseError> {
        let Some(group) = resolver.gin_group(&self.registry.methods, j) else {
            return Err(ParseError::malformed(
                &self.src,
                "constants are not supported for supergeneric parameters",
            ));
        };
        self.read_literal_value(group)
    }

    fn parse_gin_default(
        &mut self,
        resolver: &CallResolver,
        j: usize,
        gin_name: &str,
        text: &str,
    ) -> Result<Value, ParseError> {
        let Some(group) = resolver.gin_group(&self.registry.methods, j) else {
            return Err(ParseError::malformed(
                &self.src,
                "constants are not supported for supergeneric parameters",
            ));
        };
        literal::parse_default(group, text).map_err(|e| {
            ParseError::malformed(
                &self.src,
                format!(
                    "invalid default for {} {}: {}",
                    resolver.base(),
                    gin_name,
                    e.message
                ),
            )
        })
    }

    fn read_literal_value(&mut self, group: Group) -> Result<Value, ParseError> {
        LiteralReader {
            src: &mut self.src,
        }
        .read_literal(group)
    }

    /// Lowers a generic-input literal: assign methods carry the value
    /// on the invocation itself, everything else goes through an
    /// automatic slot.
    fn lower_gin(
        &mut self,
        resolver: &CallResolver,
        args: &mut ParsedArgs,
        j: usize,
        gin_name: &str,
        value: Value,
        assign: bool,
    ) -> Result<(), ParseError> {
        if assign {
            args.value = Some(value);
            return Ok(());
        }
        let auto = format!("auto_{}_gin{}_{}", resolver.base(), j, gin_name);
        self.lower_into(args, &auto, value)
    }

    fn lower_into(
        &mut self,
        args: &mut ParsedArgs,
        auto_name: &str,
        value: Value,
    ) -> Result<(), ParseError> {
        let id = self
            .registry
            .variables
            .add_automatic(auto_name, value.group())
            .map_err(|e| ParseError::from_resolve(&self.src, e.into()))?;
        args.lowered.push((id, value));
        args.inputs.push(id);
        Ok(())
    }

    /// Appends the bracketed invocation sequence for one parsed call:
    /// a synthetic assign per lowered slot, the call itself, then a
    /// synthetic clear per lowered slot.
    fn assemble(
        &mut self,
        agenda: &mut Agenda,
        method: MethodId,
        args: ParsedArgs,
        nested: Option<Agenda>,
    ) -> Result<(), ParseError> {
        let ParsedArgs {
            outputs,
            inputs,
            value,
            lowered,
        } = args;
        for (slot, value) in &lowered {
            let assign = self.assign_method_for(value.group())?;
            agenda.push(Invocation::new(assign, vec![*slot], Vec::new()).with_value(value.clone()));
        }
        let mut call = Invocation::new(method, outputs, inputs);
        if let Some(value) = value {
            call = call.with_value(value);
        }
        if let Some(nested) = nested {
            call = call.with_nested(nested);
        }
        agenda.push(call);
        for (slot, value) in &lowered {
            let delete = self.delete_method_for(value.group())?;
            agenda.push(Invocation::new(delete, Vec::new(), vec![*slot]));
        }
        Ok(())
    }

    fn assign_method_for(&mut self, group: Group) -> Result<MethodId, ParseError> {
        let name = format!("{}Assign", group.name());
        self.registry.methods.lookup(&name).ok_or_else(|| {
            ParseError::malformed(
                &self.src,
                format!("no assign method is registered for group {group}"),
            )
        })
    }

    fn delete_method_for(&mut self, group: Group) -> Result<MethodId, ParseError> {
        let Some(delete) = self.registry.methods.lookup("Delete") else {
            return Err(ParseError::malformed(
                &self.src,
                "no Delete method is registered for clearing literal slots",
            ));
        };
        self.registry
            .methods
            .specialize(delete, group)
            .map_err(|e| ParseError::from_resolve(&self.src, e.into()))
    }

    /// `INCLUDE "file"`: the file resolves against the including
    /// file's directory, then each configured include directory,
    /// verbatim and with the `.zen` extension appended. It must be a
    /// complete script; its program is spliced in at the call site.
    fn parse_include(&mut self, agenda: &mut Agenda) -> Result<(), ParseError> {
        self.src.eat_whitespace();
        let name = LiteralReader {
            src: &mut self.src,
        }
        .read_string()?;
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(ParseError::malformed(
                &self.src,
                format!("includes nested more than {MAX_INCLUDE_DEPTH} levels deep: {name}"),
            ));
        }
        let mut candidates = Vec::new();
        if let Some(dir) = self.src.path().parent() {
            candidates.push(dir.join(&name));
            candidates.push(dir.join(format!("{name}.zen")));
        }
        for dir in self.include_dirs {
            candidates.push(dir.join(&name));
            candidates.push(dir.join(format!("{name}.zen")));
        }
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            let searched = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ParseError::new(
                ParseErrorKind::IncludeNotFound,
                &self.src,
                format!("cannot find include file {name} (searched: {searched})"),
            ));
        };
        let text = fs::read_to_string(path).map_err(|e| {
            ParseError::new(
                ParseErrorKind::IncludeNotFound,
                &self.src,
                format!("cannot read include file {}: {e}", path.display()),
            )
        })?;
        debug!(file = %path.display(), "expanding include");
        let nested = Parser {
            src: SourceText::new(path.clone(), &text),
            registry: &mut *self.registry,
            include_dirs: self.include_dirs,
            depth: self.depth + 1,
        };
        let included = nested.parse()?;
        for invocation in included.invocations {
            agenda.push(invocation);
        }
        Ok(())
    }

    fn read_name(&mut self) -> Result<String, ParseError> {
        match self.src.current() {
            Some(c) if c.is_ascii_alphabetic() => {}
            Some(c) => {
                return Err(ParseError::unexpected_char(
                    &self.src,
                    c,
                    "(names start with a letter)",
                ))
            }
            None => return Err(ParseError::unexpected_eot(&self.src, "(expected a name)")),
        }
        let mut name = String::new();
        while let Some(c) = self.src.current() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            name.push(c);
            self.src.advance();
        }
        Ok(name)
    }

    fn constant_output(&self, resolver: &CallResolver) -> ParseError {
        ParseError::malformed(
            &self.src,
            format!("constants cannot be passed as outputs of {}", resolver.base()),
        )
    }

    fn missing_argument(&self, resolver: &CallResolver) -> ParseError {
        ParseError::malformed(
            &self.src,
            format!(
                "{} is missing an argument (only generic inputs with defaults may be omitted)",
                resolver.base()
            ),
        )
    }
}
