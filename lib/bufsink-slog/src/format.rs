/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::cell::RefCell;
use std::fmt::{Arguments, Write as _};
use std::io::{self, Write};

use chrono::{DateTime, TimeZone};
use itoa::Integer;
use ryu::Float;
use slog::{KV, OwnedKVList, Record, Serializer};

thread_local! {
    static TL_FMT_BUF: RefCell<String> = RefCell::new(String::with_capacity(128));
}

/// Formats a record as `<time> <level> k: v, ... <message> [<file:line>]\n`.
pub(crate) fn format_record<Tz>(
    w: &mut Vec<u8>,
    datetime: &DateTime<Tz>,
    record: &Record,
    logger_values: &OwnedKVList,
    append_code_position: bool,
) -> Result<(), slog::Error>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let time_fmt = datetime.format_with_items(bufsink_datetime::format::log::TEXT_LINE.iter());
    write!(w, "{time_fmt} {}", record.level())?;

    let mut kv_formatter = FormatterKv(w);
    logger_values.serialize(record, &mut kv_formatter)?;
    record.kv().serialize(record, &mut kv_formatter)?;

    w.push(b' ');
    let msg = record.msg();
    match msg.as_str() {
        Some("") => w.extend_from_slice(b"()"),
        Some(s) => w.extend_from_slice(s.as_bytes()),
        None => w.write_fmt(*msg)?,
    }

    if append_code_position {
        write!(w, " <{}:{}>", record.file(), record.line())?;
    }
    w.push(b'\n');
    Ok(())
}

struct FormatterKv<'a>(&'a mut Vec<u8>);

impl FormatterKv<'_> {
    fn push_before_value(&mut self, key: &str) {
        self.0.reserve(key.len() + 3);
        self.0.push(b' ');
        self.0.extend_from_slice(key.as_bytes());
        self.0.extend_from_slice(b": ");
    }

    #[inline]
    fn push_after_value(&mut self) {
        self.0.push(b',');
    }

    fn push_str_value(&mut self, v: &str) {
        // keep one record on one line
        for c in v.chars() {
            match c {
                '\n' => self.0.extend_from_slice(b"\\n"),
                '\r' => self.0.extend_from_slice(b"\\r"),
                _ => {
                    let mut b = [0u8; 4];
                    self.0.extend_from_slice(c.encode_utf8(&mut b).as_bytes());
                }
            }
        }
    }

    fn emit_integer<T: Integer>(&mut self, key: &str, value: T) -> slog::Result {
        self.push_before_value(key);

        let mut buffer = itoa::Buffer::new();
        let value_s = buffer.format(value);
        self.0.extend_from_slice(value_s.as_bytes());

        self.push_after_value();
        Ok(())
    }

    fn emit_float<T: Float>(&mut self, key: &str, value: T) -> slog::Result {
        self.push_before_value(key);

        let mut buffer = ryu::Buffer::new();
        let value_s = buffer.format(value);
        self.0.extend_from_slice(value_s.as_bytes());

        self.push_after_value();
        Ok(())
    }
}

impl Serializer for FormatterKv<'_> {
    impl_integer_by_itoa! {
        /// Emit `usize`
        usize => emit_usize
    }
    impl_integer_by_itoa! {
        /// Emit `isize`
        isize => emit_isize
    }
    impl_integer_by_itoa! {
        /// Emit `u8`
        u8 => emit_u8
    }
    impl_integer_by_itoa! {
        /// Emit `i8`
        i8 => emit_i8
    }
    impl_integer_by_itoa! {
        /// Emit `u16`
        u16 => emit_u16
    }
    impl_integer_by_itoa! {
        /// Emit `i16`
        i16 => emit_i16
    }
    impl_integer_by_itoa! {
        /// Emit `u32`
        u32 => emit_u32
    }
    impl_integer_by_itoa! {
        /// Emit `i32`
        i32 => emit_i32
    }
    impl_float_by_ryu! {
        /// Emit `f32`
        f32 => emit_f32
    }
    impl_integer_by_itoa! {
        /// Emit `u64`
        u64 => emit_u64
    }
    impl_integer_by_itoa! {
        /// Emit `i64`
        i64 => emit_i64
    }
    impl_float_by_ryu! {
        /// Emit `f64`
        f64 => emit_f64
    }

    fn emit_bool(&mut self, key: slog::Key, value: bool) -> slog::Result {
        self.push_before_value(key);
        if value {
            self.0.extend_from_slice(b"true");
        } else {
            self.0.extend_from_slice(b"false");
        }
        self.push_after_value();
        Ok(())
    }

    fn emit_char(&mut self, key: slog::Key, value: char) -> slog::Result {
        self.push_before_value(key);
        let mut b = [0u8; 4];
        self.push_str_value(value.encode_utf8(&mut b));
        self.push_after_value();
        Ok(())
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.push_before_value(key);
        self.0.extend_from_slice(b"()");
        self.push_after_value();
        Ok(())
    }

    fn emit_none(&mut self, _key: slog::Key) -> slog::Result {
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, value: &str) -> slog::Result {
        self.push_before_value(key);
        self.push_str_value(value);
        self.push_after_value();
        Ok(())
    }

    fn emit_arguments(&mut self, key: slog::Key, value: &Arguments) -> slog::Result {
        if let Some(s) = value.as_str() {
            self.emit_str(key, s)
        } else {
            TL_FMT_BUF.with_borrow_mut(|buf| {
                buf.clear();
                buf.write_fmt(*value).map_err(io::Error::other)?;
                self.emit_str(key, buf.as_str())
            })
        }
    }
}
