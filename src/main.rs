// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::io::{
    self,
    BufRead,
    Write,
};

use anyhow::Context;
use cesium_skiplist::{
    Grid,
    SkipList,
};
use rand::Rng;

/// Upper bound (inclusive) of the randomly generated starting keys.
const MAX_RANDOM_KEY: i64 = 100;

/// Prints `message` and reads one trimmed line. `None` on EOF.
fn prompt<R: BufRead>(input: &mut R, message: &str) -> anyhow::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Keeps asking until the answer parses. `None` on EOF.
fn prompt_number<R, T>(input: &mut R, message: &str) -> anyhow::Result<Option<T>>
where
    R: BufRead,
    T: std::str::FromStr,
{
    loop {
        match prompt(input, message)? {
            | None => return Ok(None),
            | Some(answer) => match answer.parse() {
                | Ok(value) => return Ok(Some(value)),
                | Err(_) => println!("'{}' is not a valid number.", answer),
            },
        }
    }
}

/// The single way out of the driver, whether the user pressed Enter or input
/// ran out.
fn exit() -> anyhow::Result<()> {
    println!("Exiting...");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let Some(max_level) = prompt_number::<_, usize>(&mut input, "What do you want the max height to be? ")?
    else {
        return exit();
    };
    let mut list: SkipList<i64> = SkipList::new(max_level).context("invalid skip list parameters")?;

    let Some(initial_count) =
        prompt_number::<_, usize>(&mut input, "How many elements do you want to initially insert? ")?
    else {
        return exit();
    };
    let mut rng = rand::thread_rng();
    let initial: Vec<i64> = (0..initial_count)
        .map(|_| rng.gen_range(1..=MAX_RANDOM_KEY))
        .collect();
    println!("Generated elements: {:?}", initial);
    list.extend(initial);

    println!("\nInitial SkipList:");
    println!("{}", Grid::new(&list));

    loop {
        let command = match prompt(
            &mut input,
            "Enter a command ('insert', 'delete', or press Enter to exit): ",
        )? {
            | Some(command) if !command.is_empty() => command.to_lowercase(),
            | _ => return exit(),
        };

        match command.as_str() {
            | "insert" => {
                let Some(value) = prompt_number::<_, i64>(&mut input, "Enter a value to insert: ")? else {
                    return exit();
                };
                list.insert(value);
                println!("Inserted {}. Updated SkipList:", value);
            },
            | "delete" => {
                let Some(value) = prompt_number::<_, i64>(&mut input, "Enter a value to delete: ")? else {
                    return exit();
                };
                if list.delete(&value) {
                    println!("Deleted {}. Updated SkipList:", value);
                } else {
                    println!("{} is not in the SkipList:", value);
                }
            },
            | _ => {
                println!("Invalid command. Please enter 'insert' or 'delete'.");
                continue;
            },
        }

        println!("{}", Grid::new(&list));
    }
}
