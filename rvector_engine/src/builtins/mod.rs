//! Builtin function identifiers and the default (primitive) call path.
//!
//! Every builtin the engine implements has a [`BuiltinId`]; the name
//! table maps R-level names (including operator spellings like `"+"`
//! and replacement forms like `"class<-"`) to identifiers. The default
//! path here is what generic dispatch falls back to when the first
//! argument carries no class, and what class methods delegate to after
//! unwrapping their receiver.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Conditions, RError, RResult};
use crate::ops::{self, ArithOp, CmpOp};
use crate::recycle::concat;
use crate::value::{RVector, Value};

pub mod attributes;
pub mod conversion;
pub mod logical;
pub mod math;
pub mod ordering;
pub mod reductions;
pub mod sequences;
pub mod sets;
pub mod strings;

/// The arguments of one builtin call: positional values plus named
/// values in call order.
#[derive(Debug, Clone)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new(positional: Vec<Value>, named: Vec<(String, Value)>) -> Self {
        CallArgs { positional, named }
    }

    pub fn positional(positional: Vec<Value>) -> Self {
        CallArgs::new(positional, Vec::new())
    }

    pub fn arg(&self, i: usize) -> Option<&Value> {
        self.positional.get(i)
    }

    pub fn require(&self, i: usize, builtin: &str) -> RResult<&Value> {
        self.positional.get(i).ok_or_else(|| {
            RError::ArgumentError(format!(
                "{}: argument {} is missing, with no default",
                builtin,
                i + 1
            ))
        })
    }

    pub fn require_vector(&self, i: usize, builtin: &str) -> RResult<&RVector> {
        self.require(i, builtin)?.expect_vector(builtin)
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// A named logical flag such as `na.rm` or `decreasing`. Missing
    /// uses the default; NA is rejected.
    pub fn flag(&self, name: &str, default: bool) -> RResult<bool> {
        match self.flag_allow_na(name)? {
            Some(Some(b)) => Ok(b),
            Some(None) => Err(RError::ArgumentError(format!(
                "invalid '{}' value (NA)",
                name
            ))),
            None => Ok(default),
        }
    }

    /// A named logical flag where NA is meaningful (`na.last`).
    /// `None` = absent, `Some(None)` = NA.
    pub fn flag_allow_na(&self, name: &str) -> RResult<Option<Option<bool>>> {
        let Some(value) = self.named(name) else {
            return Ok(None);
        };
        let v = value.expect_vector(name)?;
        v.as_flag()
            .map(Some)
            .ok_or_else(|| RError::ArgumentError(format!("invalid '{}' value", name)))
    }
}

/// Identifiers for the builtins implemented in Rust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinId {
    // Combination
    Combine,

    // Logical reductions
    All,
    Any,

    // Numeric reductions
    Sum,
    Prod,
    Mean,
    Max,
    Min,
    Range,
    CumSum,

    // Ordering
    Order,
    Sort,
    Rev,

    // Membership and uniqueness
    Unique,
    Duplicated,
    AnyDuplicated,
    Match,
    In, // %in%

    // Sequences and replication
    Rep,
    RepLen,
    Seq,
    SeqLen,
    SeqAlong,
    Length,

    // Strings
    Substr,
    NChar,
    Paste0,
    ToUpper,
    ToLower,
    StartsWith,
    EndsWith,
    Grepl,
    Gregexpr,

    // Kind conversion
    AsLogical,
    AsInteger,
    AsDouble,
    AsComplex,
    AsCharacter,
    AsRaw,

    // Predicates
    IsNa,
    IsNan,
    IsFinite,
    IsInfinite,
    IsLogical,
    IsInteger,
    IsDouble,
    IsNumeric,
    IsCharacter,
    IsComplex,
    IsList,
    IsNull,
    IsFactor,

    // Attributes and classes
    Attr,
    AttrAssign,
    AttributesOf,
    ClassOf,
    ClassAssign,
    OldClass,
    Names,
    NamesAssign,
    Dim,
    DimAssign,
    Dimnames,
    DimnamesAssign,
    Levels,
    NLevels,
    LevelsAssign,

    // Math
    Log,
    Log2,
    Log10,
    Exp,
    Sqrt,
    Abs,
    Floor,
    Ceiling,
    Round,
    Trunc,

    // Classed constructors
    Factor,
    AsDate,
    Ts,

    // Operators
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    IntDiv,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Xor,
}

static NAME_TABLE: Lazy<HashMap<&'static str, BuiltinId>> = Lazy::new(|| {
    use BuiltinId::*;
    HashMap::from([
        ("c", Combine),
        ("all", All),
        ("any", Any),
        ("sum", Sum),
        ("prod", Prod),
        ("mean", Mean),
        ("max", Max),
        ("min", Min),
        ("range", Range),
        ("cumsum", CumSum),
        ("order", Order),
        ("sort", Sort),
        ("rev", Rev),
        ("unique", Unique),
        ("duplicated", Duplicated),
        ("anyDuplicated", AnyDuplicated),
        ("match", Match),
        ("%in%", In),
        ("rep", Rep),
        ("rep_len", RepLen),
        ("seq", Seq),
        ("seq_len", SeqLen),
        ("seq_along", SeqAlong),
        ("length", Length),
        ("substr", Substr),
        ("nchar", NChar),
        ("paste0", Paste0),
        ("toupper", ToUpper),
        ("tolower", ToLower),
        ("startsWith", StartsWith),
        ("endsWith", EndsWith),
        ("grepl", Grepl),
        ("gregexpr", Gregexpr),
        ("as.logical", AsLogical),
        ("as.integer", AsInteger),
        ("as.double", AsDouble),
        ("as.numeric", AsDouble),
        ("as.complex", AsComplex),
        ("as.character", AsCharacter),
        ("as.raw", AsRaw),
        ("is.na", IsNa),
        ("is.nan", IsNan),
        ("is.finite", IsFinite),
        ("is.infinite", IsInfinite),
        ("is.logical", IsLogical),
        ("is.integer", IsInteger),
        ("is.double", IsDouble),
        ("is.numeric", IsNumeric),
        ("is.character", IsCharacter),
        ("is.complex", IsComplex),
        ("is.list", IsList),
        ("is.null", IsNull),
        ("is.factor", IsFactor),
        ("attr", Attr),
        ("attr<-", AttrAssign),
        ("attributes", AttributesOf),
        ("class", ClassOf),
        ("class<-", ClassAssign),
        ("oldClass", OldClass),
        ("names", Names),
        ("names<-", NamesAssign),
        ("dim", Dim),
        ("dim<-", DimAssign),
        ("dimnames", Dimnames),
        ("dimnames<-", DimnamesAssign),
        ("levels", Levels),
        ("nlevels", NLevels),
        ("levels<-", LevelsAssign),
        ("log", Log),
        ("log2", Log2),
        ("log10", Log10),
        ("exp", Exp),
        ("sqrt", Sqrt),
        ("abs", Abs),
        ("floor", Floor),
        ("ceiling", Ceiling),
        ("round", Round),
        ("trunc", Trunc),
        ("factor", Factor),
        ("as.Date", AsDate),
        ("ts", Ts),
        ("+", Add),
        ("-", Sub),
        ("*", Mul),
        ("/", Div),
        ("^", Pow),
        ("%%", Mod),
        ("%/%", IntDiv),
        ("==", Eq),
        ("!=", Ne),
        ("<", Lt),
        ("<=", Le),
        (">", Gt),
        (">=", Ge),
        ("&", And),
        ("|", Or),
        ("!", Not),
        ("xor", Xor),
    ])
});

/// Resolve a builtin name (R spelling) to its identifier.
pub fn lookup(name: &str) -> Option<BuiltinId> {
    NAME_TABLE.get(name).copied()
}

/// Run the default (primitive) implementation of a builtin by name.
/// Class methods use this to delegate after stripping their receiver.
pub(crate) fn call_default_by_name(
    name: &str,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    match lookup(name) {
        Some(id) => call_default(id, args, conds),
        None => Err(RError::UnknownBuiltin(name.to_string())),
    }
}

/// An operand for the operator builtins: `NULL` behaves as an empty
/// logical vector (so `NULL + 1` is an empty numeric result).
fn operand(v: &Value) -> RVector {
    match v.as_vector() {
        Some(vec) => vec.clone(),
        None => RVector::logical(Vec::new()),
    }
}

fn binary_operands<'a>(args: &'a CallArgs, builtin: &str) -> RResult<(&'a Value, &'a Value)> {
    Ok((args.require(0, builtin)?, args.require(1, builtin)?))
}

fn arith_builtin(op: ArithOp, args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    // Unary +/- negate (or pass through) a single operand.
    if args.positional.len() == 1 && matches!(op, ArithOp::Add | ArithOp::Sub) {
        let a = operand(args.require(0, op.as_str())?);
        if let ArithOp::Add = op {
            return Ok(Value::Vector(a));
        }
        let zero = RVector::scalar_integer(0);
        let mut negated = ops::arith(ArithOp::Sub, &zero, &a, conds)?;
        negated.copy_shape_attrs_from(&a);
        return Ok(Value::Vector(negated));
    }
    let (a, b) = binary_operands(args, op.as_str())?;
    let out = ops::arith(op, &operand(a), &operand(b), conds)?;
    Ok(Value::Vector(out))
}

fn compare_builtin(op: CmpOp, args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let (a, b) = binary_operands(args, op.as_str())?;
    let out = ops::compare(op, &operand(a), &operand(b), conds)?;
    Ok(Value::Vector(out))
}

/// The default implementation for every builtin.
pub(crate) fn call_default(
    id: BuiltinId,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    use BuiltinId::*;
    match id {
        Combine => {
            let refs: Vec<&Value> = args.positional.iter().collect();
            concat(&refs, conds)
        }

        All => logical::all(args, conds),
        Any => logical::any(args, conds),

        Sum => reductions::sum(args, conds),
        Prod => reductions::prod(args, conds),
        Mean => reductions::mean(args, conds),
        Max => reductions::extreme(args, conds, true),
        Min => reductions::extreme(args, conds, false),
        Range => reductions::range(args, conds),
        CumSum => reductions::cumsum(args, conds),

        Order => ordering::order(args, conds),
        Sort => ordering::sort(args, conds),
        Rev => ordering::rev(args, conds),

        Unique => sets::unique(args, conds),
        Duplicated => sets::duplicated(args, conds),
        AnyDuplicated => sets::any_duplicated(args, conds),
        Match => sets::match_positions(args, conds),
        In => sets::is_element(args, conds),

        Rep => sequences::rep(args, conds),
        RepLen => sequences::rep_len(args, conds),
        Seq => sequences::seq(args, conds),
        SeqLen => sequences::seq_len(args, conds),
        SeqAlong => sequences::seq_along(args, conds),
        Length => sequences::length(args, conds),

        Substr => strings::substr(args, conds),
        NChar => strings::nchar(args, conds),
        Paste0 => strings::paste0(args, conds),
        ToUpper => strings::toupper(args, conds),
        ToLower => strings::tolower(args, conds),
        StartsWith => strings::starts_with(args, conds),
        EndsWith => strings::ends_with(args, conds),
        Grepl => strings::grepl(args, conds),
        Gregexpr => strings::gregexpr(args, conds),

        AsLogical | AsInteger | AsDouble | AsComplex | AsCharacter | AsRaw => {
            conversion::as_kind(id, args, conds)
        }

        IsNa | IsNan | IsFinite | IsInfinite => conversion::elementwise_predicate(id, args, conds),
        IsLogical | IsInteger | IsDouble | IsNumeric | IsCharacter | IsComplex | IsList
        | IsNull | IsFactor => conversion::type_predicate(id, args),

        Attr => attributes::attr_get(args, conds),
        AttrAssign => attributes::attr_assign(args, conds),
        AttributesOf => attributes::attributes_of(args, conds),
        ClassOf => attributes::class_of(args, conds),
        ClassAssign => attributes::class_assign(args, conds),
        OldClass => attributes::old_class(args, conds),
        Names => attributes::names(args, conds),
        NamesAssign => attributes::names_assign(args, conds),
        Dim => attributes::dim(args, conds),
        DimAssign => attributes::dim_assign(args, conds),
        Dimnames => attributes::dimnames(args, conds),
        DimnamesAssign => attributes::dimnames_assign(args, conds),
        Levels => attributes::levels(args, conds),
        NLevels => attributes::nlevels(args, conds),
        LevelsAssign => attributes::levels_assign(args, conds),

        Log | Log2 | Log10 | Exp | Sqrt | Abs | Floor | Ceiling | Round | Trunc => {
            math::unary_math(id, args, conds)
        }

        Factor => crate::classes::factor::factor(args, conds),
        AsDate => crate::classes::date::as_date(args, conds),
        Ts => crate::classes::ts::ts(args, conds),

        Add => arith_builtin(ArithOp::Add, args, conds),
        Sub => arith_builtin(ArithOp::Sub, args, conds),
        Mul => arith_builtin(ArithOp::Mul, args, conds),
        Div => arith_builtin(ArithOp::Div, args, conds),
        Pow => arith_builtin(ArithOp::Pow, args, conds),
        Mod => arith_builtin(ArithOp::Mod, args, conds),
        IntDiv => arith_builtin(ArithOp::IntDiv, args, conds),

        Eq => compare_builtin(CmpOp::Eq, args, conds),
        Ne => compare_builtin(CmpOp::Ne, args, conds),
        Lt => compare_builtin(CmpOp::Lt, args, conds),
        Le => compare_builtin(CmpOp::Le, args, conds),
        Gt => compare_builtin(CmpOp::Gt, args, conds),
        Ge => compare_builtin(CmpOp::Ge, args, conds),

        And => {
            let (a, b) = binary_operands(args, "&")?;
            Ok(Value::Vector(ops::logical_and(
                &operand(a),
                &operand(b),
                conds,
            )?))
        }
        Or => {
            let (a, b) = binary_operands(args, "|")?;
            Ok(Value::Vector(ops::logical_or(
                &operand(a),
                &operand(b),
                conds,
            )?))
        }
        Xor => {
            let (a, b) = binary_operands(args, "xor")?;
            Ok(Value::Vector(ops::logical_xor(
                &operand(a),
                &operand(b),
                conds,
            )?))
        }
        Not => {
            let a = operand(args.require(0, "!")?);
            Ok(Value::Vector(ops::logical_not(&a, conds)?))
        }
    }
}
