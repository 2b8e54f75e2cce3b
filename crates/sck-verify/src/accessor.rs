//! Accessor naming and sample values for behavioral checks.
//!
//! Exercise authors describe attributes by human-readable labels such as
//! `"phone number"`. These helpers derive the conventional accessor names
//! from a label and produce random sample values to feed setters.

use rand::Rng;

use sck_core::simple_type_name;

/// Camel-case `label` behind `prefix`, uppercasing the first character and
/// every character that follows a space. Spaces are dropped.
fn camel(prefix: &str, label: &str, capitalize_first: bool) -> Option<String> {
    let mut chars = label.trim().chars();
    let first = chars.next()?;
    let mut out = String::with_capacity(prefix.len() + label.len());
    out.push_str(prefix);
    if capitalize_first {
        out.extend(first.to_uppercase());
    } else {
        out.push(first);
    }
    let mut after_space = false;
    for c in chars {
        if c == ' ' {
            after_space = true;
            continue;
        }
        if after_space {
            out.extend(c.to_uppercase());
            after_space = false;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Getter name for an attribute label: `"phone number"` → `getPhoneNumber`.
/// Returns `None` for a blank label.
pub fn getter_name(label: &str) -> Option<String> {
    camel("get", label, true)
}

/// Setter name and attribute name for a label:
/// `"phone number"` → (`setPhoneNumber`, `phoneNumber`).
/// Returns `None` for a blank label.
pub fn setter_name(label: &str) -> Option<(String, String)> {
    let method = camel("set", label, true)?;
    let attribute = camel("", label, false)?;
    Some((method, attribute))
}

/// The boxed counterpart of a primitive type name. Types other than `int`,
/// `boolean` and `double` map to `Float`.
pub fn boxed_type_name(type_name: &str) -> &'static str {
    match simple_type_name(type_name) {
        "int" => "Integer",
        "boolean" => "Boolean",
        "double" => "Double",
        _ => "Float",
    }
}

/// A random sample value rendered as a string: `"true"`/`"false"` for
/// `boolean` (true when a random digit exceeds 4), otherwise five random
/// decimal digits.
pub fn sample_value<R: Rng + ?Sized>(type_name: &str, rng: &mut R) -> String {
    if simple_type_name(type_name) == "boolean" {
        let digit: u8 = rng.gen_range(0..10);
        return (digit > 4).to_string();
    }
    (0..5)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// [`sample_value`] drawn from the thread-local generator.
pub fn random_sample_value(type_name: &str) -> String {
    sample_value(type_name, &mut rand::thread_rng())
}
