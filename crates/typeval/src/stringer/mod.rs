//! Canonical type strings.
//!
//! Rendering dispatches on [`Tag`] through a table built once per process.
//! Operators bind by priority, lowest first: `,` then `|` then `^` then `&`,
//! then a plain type. A combinator nested at or above `|` priority is
//! parenthesized.
//!
//! ```text
//! []int|string          any of (array of int, string)
//! [1,2]string           sized array
//! {int,...string}       variadic tuple
//! map[string,0,5]int    sized map
//! {"a":int,"b"?:int}    struct
//! 1..10  1...10  ..10   integer ranges
//! ```

use std::fmt::Write as _;
use std::sync::OnceLock;

use typeval_stack::ensure_sufficient_stack;

use crate::guard::Seen;
use crate::tag::Tag;
use crate::value::Bounds;
use crate::Value;

/// Binding strength of the context a type is rendered in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prio {
    Comma,
    Or,
    Xor,
    And,
    Type,
}

/// Renders one variant. Receives the value whose tag selected it.
pub type Renderer = fn(&mut TypeStringer, &mut Seen, &Value, Prio);

static RENDERERS: OnceLock<[Renderer; Tag::COUNT]> = OnceLock::new();

fn renderers() -> &'static [Renderer; Tag::COUNT] {
    RENDERERS.get_or_init(|| {
        let mut table: [Renderer; Tag::COUNT] = [render_label as Renderer; Tag::COUNT];
        table[Tag::True.index()] = render_bool;
        table[Tag::False.index()] = render_bool;
        table[Tag::IntegerExact.index()] = render_int;
        table[Tag::IntegerRange.index()] = render_int_range;
        table[Tag::FloatExact.index()] = render_float;
        table[Tag::FloatRange.index()] = render_float_range;
        table[Tag::BinarySized.index()] = render_sized_binary;
        table[Tag::StringExact.index()] = render_string;
        table[Tag::StringSized.index()] = render_sized_string;
        table[Tag::StringPattern.index()] = render_pattern;
        table[Tag::CiString.index()] = render_ci_string;
        table[Tag::RegexpExact.index()] = render_regexp;
        table[Tag::TimeExact.index()] = render_time;
        table[Tag::Native.index()] = render_native_type;
        table[Tag::Array.index()] = render_array_type;
        table[Tag::ArraySized.index()] = render_array_type;
        table[Tag::ArrayExact.index()] = render_array;
        table[Tag::Tuple.index()] = render_tuple;
        table[Tag::Map.index()] = render_map_type;
        table[Tag::MapSized.index()] = render_map_type;
        table[Tag::MapExact.index()] = render_map;
        table[Tag::MapEntryExact.index()] = render_entry;
        table[Tag::Struct.index()] = render_struct;
        table[Tag::Not.index()] = render_not;
        table[Tag::AllOf.index()] = render_logical;
        table[Tag::AnyOf.index()] = render_logical;
        table[Tag::OneOf.index()] = render_logical;
        table[Tag::Sensitive.index()] = render_sensitive;
        table[Tag::Named.index()] = render_named;
        table
    })
}

/// The renderer registered for `tag`.
#[inline]
pub fn renderer(tag: Tag) -> Renderer {
    renderers()[tag.index()]
}

/// Canonical type string of `v`.
pub fn type_string(v: &Value) -> String {
    TypeStringer::new().render(v)
}

/// Builds a type string.
#[derive(Debug, Default)]
pub struct TypeStringer {
    out: String,
    expand_named: bool,
}

impl TypeStringer {
    pub fn new() -> Self {
        TypeStringer::default()
    }

    /// Render bound named references as their target rather than their name.
    #[must_use]
    pub fn expand_named(mut self, expand: bool) -> Self {
        self.expand_named = expand;
        self
    }

    pub fn render(mut self, v: &Value) -> String {
        self.write(&mut Seen::new(), v, Prio::Comma);
        self.out
    }

    /// Append `v` rendered in a context of priority `prio`.
    pub fn write(&mut self, seen: &mut Seen, v: &Value, prio: Prio) {
        ensure_sufficient_stack(|| {
            if self.expand_named {
                if let Value::Named(n) = v {
                    if let Some(target) = n.target() {
                        self.write(seen, target, prio);
                        return;
                    }
                }
            }
            let tag = v.tag();
            let render = renderer(tag);
            let done = seen.visit(v, false, |seen| {
                render(self, seen, v, prio);
                true
            });
            if !done {
                let _ = write!(self.out, "<recursive self reference to {tag} type>");
            }
        });
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        self.out.push(c);
    }

    fn join<'a>(
        &mut self,
        seen: &mut Seen,
        items: impl IntoIterator<Item = &'a Value>,
        sep: &str,
        prio: Prio,
    ) {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.out.push_str(sep);
            }
            self.write(seen, item, prio);
        }
    }

    /// `min` followed by `,max` unless `max` is unbounded.
    fn bounds(&mut self, b: Bounds) {
        let _ = write!(self.out, "{}", b.min);
        if b.max != Bounds::UNBOUNDED {
            let _ = write!(self.out, ",{}", b.max);
        }
    }

    fn quoted(&mut self, s: &str) {
        let _ = write!(self.out, "{s:?}");
    }
}

/// Shortest text that reads back as `f`, always carrying a fraction or
/// exponent so it cannot be mistaken for an integer.
pub fn format_float(f: f64) -> String {
    let s = f.to_string();
    if f.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

fn render_label(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    w.push_str(v.tag().label());
}

fn render_bool(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    w.push_str(if matches!(v, Value::Bool(true)) { "true" } else { "false" });
}

fn render_int(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Int(i) = v {
        let _ = write!(w.out, "{i}");
    }
}

fn range_op(inclusive: bool) -> &'static str {
    if inclusive {
        ".."
    } else {
        "..."
    }
}

fn render_int_range(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::IntegerRange(r) = v {
        if r.min() != i64::MIN {
            let _ = write!(w.out, "{}", r.min());
        }
        w.push_str(range_op(r.inclusive()));
        if r.max() != i64::MAX {
            let _ = write!(w.out, "{}", r.max());
        }
    }
}

fn render_float(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Float(f) = v {
        w.push_str(&format_float(*f));
    }
}

fn render_float_range(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::FloatRange(r) = v {
        if r.min() > f64::MIN {
            w.push_str(&format_float(r.min()));
        }
        w.push_str(range_op(r.inclusive()));
        if r.max() < f64::MAX {
            w.push_str(&format_float(r.max()));
        }
    }
}

fn render_sized_binary(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    w.push_str("binary");
    if let Value::SizedBinaryType(b) = v {
        w.push('[');
        w.bounds(*b);
        w.push(']');
    }
}

fn render_string(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Str(s) = v {
        w.quoted(s.as_str());
    }
}

fn render_sized_string(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    w.push_str("string");
    if let Value::SizedStringType(b) = v {
        w.push('[');
        w.bounds(*b);
        w.push(']');
    }
}

fn render_pattern(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::PatternType(re) = v {
        w.push('/');
        for c in re.as_str().chars() {
            if c == '/' {
                w.push('\\');
            }
            w.push(c);
        }
        w.push('/');
    }
}

fn render_ci_string(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::CiStringType(s) = v {
        w.push('~');
        w.quoted(s.as_str());
    }
}

fn render_regexp(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Regexp(re) = v {
        w.push_str("regexp[");
        w.quoted(re.as_str());
        w.push(']');
    }
}

fn render_time(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Time(t) = v {
        w.push_str("time[");
        w.quoted(&t.to_rfc3339());
        w.push(']');
    }
}

fn render_native_type(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    w.push_str("native");
    if let Value::NativeType(Some(name)) = v {
        w.push('[');
        w.quoted(name);
        w.push(']');
    }
}

fn render_array_type(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    match v {
        Value::SizedArray(t) => {
            if t.bounds().is_unbounded() {
                w.push_str("[]");
            } else {
                w.push('[');
                w.bounds(t.bounds());
                w.push(']');
            }
            w.write(seen, t.element(), Prio::Type);
        }
        _ => w.push_str("[]any"),
    }
}

fn render_array(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    if let Value::Array(a) = v {
        w.push('{');
        w.join(seen, a.iter(), ",", Prio::Comma);
        w.push('}');
    }
}

fn render_tuple(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    let Value::Tuple(t) = v else { return };
    w.push('{');
    match t.types().split_last() {
        Some((tail, fixed)) if t.is_variadic() => {
            for slot in fixed {
                w.write(seen, slot, Prio::Comma);
                w.push(',');
            }
            w.push_str("...");
            w.write(seen, tail, Prio::Comma);
        }
        _ => w.join(seen, t.types(), ",", Prio::Comma),
    }
    w.push('}');
}

fn render_map_type(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    match v {
        Value::SizedMap(t) => {
            w.push_str("map[");
            w.write(seen, t.key(), Prio::Comma);
            if !t.bounds().is_unbounded() {
                w.push(',');
                w.bounds(t.bounds());
            }
            w.push(']');
            w.write(seen, t.value(), Prio::Type);
        }
        _ => w.push_str("map[any]any"),
    }
}

fn render_map(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    if let Value::Map(m) = v {
        w.push('{');
        for (i, (k, val)) in m.iter().enumerate() {
            if i > 0 {
                w.push(',');
            }
            w.write(seen, k, Prio::Comma);
            w.push(':');
            w.write(seen, val, Prio::Comma);
        }
        w.push('}');
    }
}

fn render_entry(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    if let Value::Entry(e) = v {
        w.write(seen, e.key(), Prio::Comma);
        w.push(':');
        w.write(seen, e.value(), Prio::Comma);
    }
}

fn render_struct(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    let Value::Struct(t) = v else { return };
    w.push('{');
    for (i, e) in t.entries().iter().enumerate() {
        if i > 0 {
            w.push(',');
        }
        w.write(seen, e.key(), Prio::Comma);
        if !e.is_required() {
            w.push('?');
        }
        w.push(':');
        w.write(seen, e.value(), Prio::Comma);
    }
    if t.is_additional() {
        if !t.entries().is_empty() {
            w.push(',');
        }
        w.push_str("...");
    }
    w.push('}');
}

fn render_not(w: &mut TypeStringer, seen: &mut Seen, v: &Value, _: Prio) {
    if let Value::Not(n) = v {
        w.push('!');
        w.write(seen, n.negated(), Prio::Type);
    }
}

fn render_logical(w: &mut TypeStringer, seen: &mut Seen, v: &Value, prio: Prio) {
    let Value::Logical(l) = v else { return };
    let (sep, own) = match v.tag() {
        Tag::AnyOf => ("|", Prio::Or),
        Tag::OneOf => ("^", Prio::Xor),
        _ => ("&", Prio::And),
    };
    let parens = prio >= Prio::Or;
    if parens {
        w.push('(');
    }
    w.join(seen, l.members(), sep, own);
    if parens {
        w.push(')');
    }
}

fn render_sensitive(w: &mut TypeStringer, seen: &mut Seen, v: &Value, prio: Prio) {
    let Value::Sensitive(s) = v else { return };
    let wrapped = s.wrapped();
    if wrapped.is_exact() {
        w.push_str("sensitive [value redacted]");
    } else if matches!(wrapped, Value::AnyType) {
        w.push_str("sensitive");
    } else {
        w.push_str("sensitive[");
        w.write(seen, wrapped, prio);
        w.push(']');
    }
}

fn render_named(w: &mut TypeStringer, _: &mut Seen, v: &Value, _: Prio) {
    if let Value::Named(n) = v {
        w.push_str(n.name());
    }
}
