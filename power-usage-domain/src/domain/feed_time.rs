use time::{macros::format_description, PrimitiveDateTime};

/// Parse a feed timestamp of the form `yyyy/M/d H:m`.
///
/// Month, day, hour and minute may be written with or without a leading zero.
/// The feed carries no offset; values are local (JST) wall-clock time.
pub fn parse_feed_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        s,
        format_description!(
            "[year]/[month padding:none]/[day padding:none] [hour padding:none]:[minute padding:none]"
        ),
    )
    .ok()
}

/// Render a timestamp the way the feed writes it, with a zero-padded minute
/// (`2024/7/5 9:05`). The output is accepted by [`parse_feed_timestamp`].
pub fn format_feed_timestamp(ts: PrimitiveDateTime) -> String {
    ts.format(format_description!(
        "[year]/[month padding:none]/[day padding:none] [hour padding:none]:[minute]"
    ))
    .unwrap_or_else(|_| ts.to_string())
}

#[cfg(feature = "serde")]
pub(crate) fn serialize_opt<S>(value: &Option<PrimitiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(ts) => serializer.serialize_some(&format_feed_timestamp(*ts)),
        None => serializer.serialize_none(),
    }
}
