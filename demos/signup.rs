//! Validating a decoded sign-up form.
//!
//! Run with: cargo run --example signup

use formtree::prelude::*;
use formtree::{validate, Value};
use serde::Deserialize;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let signup = RecordFormat::builder()
        .required("agree", BoolFormat::new())
        .required("age", NumberFormat::new().is_min(0).is_integer())
        .required("username", TextFormat::new().trimmed().min_length(3).matches("^[a-z0-9_]+$")?)
        .optional_or("lang", "en", TextFormat::new().one_of(["en", "fr", "de"]))
        .optional("birthday", DateFormat::new().not_after("2024-12-31")?)
        .build()?;

    // What a form body decoder hands over: every field is a string and the
    // unchecked checkbox is simply absent.
    let good = Value::deserialize(serde_json::json!({
        "age": " 017.0 ",
        "username": "  alice_1 ",
        "birthday": "2001-2-3"
    }))?;
    let out = validate(&signup, &good).map_err(|log| log.to_string())?;
    println!("accepted: {}", out);

    let bad = Value::deserialize(serde_json::json!({
        "agree": "maybe",
        "age": "-4",
        "lang": "it"
    }))?;
    match validate(&signup, &bad) {
        Ok(out) => println!("unexpectedly accepted: {}", out),
        Err(log) => {
            println!("rejected:\n{}", log);
            println!("as json: {}", serde_json::to_string_pretty(log.entries())?);
        }
    }

    Ok(())
}
