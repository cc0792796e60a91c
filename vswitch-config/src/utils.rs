use knuffel::errors::DecodeError;

/// A number that may be written either as an integer or as a decimal.
///
/// The value is range-checked against `MIN..=MAX` at decode time.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatOrInt<const MIN: i32, const MAX: i32>(pub f64);

impl<const MIN: i32, const MAX: i32> FloatOrInt<MIN, MAX> {
    fn check(v: f64) -> Result<f64, String> {
        if (f64::from(MIN)..=f64::from(MAX)).contains(&v) {
            Ok(v)
        } else {
            Err(format!("value must be between {MIN} and {MAX}"))
        }
    }
}

impl<S: knuffel::traits::ErrorSpan, const MIN: i32, const MAX: i32> knuffel::DecodeScalar<S>
    for FloatOrInt<MIN, MAX>
{
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        let v = match &**val {
            knuffel::ast::Literal::Int(ref value) => match i32::try_from(value) {
                Ok(v) => f64::from(v),
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    return Ok(Self::default());
                }
            },
            knuffel::ast::Literal::Decimal(ref value) => match f64::try_from(value) {
                Ok(v) => v,
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    return Ok(Self::default());
                }
            },
            _ => {
                ctx.emit_error(DecodeError::scalar_kind(knuffel::decode::Kind::Int, val));
                return Ok(Self::default());
            }
        };

        match Self::check(v) {
            Ok(v) => Ok(Self(v)),
            Err(msg) => {
                ctx.emit_error(DecodeError::conversion(val, msg));
                Ok(Self::default())
            }
        }
    }
}
