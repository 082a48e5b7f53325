use anyhow::{Context, Result};
use argbind::{Arg, Dispatcher, ErrorPolicy, Parser};
use tracing_subscriber::{EnvFilter, fmt};

const PROGRAM: &str = "argbind-demo";

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let mut commands = Dispatcher::new(PROGRAM);
    commands.title("argbind-demo -- example usage of argbind.");
    commands
        .command("sum")?
        .description("Add up integers")
        .handle(sum);
    commands
        .command("run")?
        .description("Run executable")
        .handle(run);
    commands
        .command("test")?
        .description("Manage tests")
        .handle(test);
    commands
        .default_command("greet")?
        .description("Say hello")
        .handle(greet);

    let status = commands
        .parse(&args, ErrorPolicy::Exit)
        .context("invalid command declarations")?;
    std::process::exit(status)
}

fn sum(argv: &[&str]) -> argbind::Result<i32> {
    let mut ints: Vec<i64> = Vec::new();
    let mut free: Vec<i64> = Vec::new();
    {
        let mut parser = Parser::with_mode(PROGRAM, "sum");
        parser.title("Print the sum of every -i value and free argument");
        parser
            .add(
                Arg::new('i', "int")
                    .repeatable()
                    .append(&mut ints)?
                    .value_type("INTEGER")
                    .description("some integers"),
            )?
            .add_help('h', Some("help"))?;
        parser.free_arguments("numbers").unlimited().store(&mut free);
        parser.parse(argv, ErrorPolicy::Exit)?;
    }

    let total: i64 = ints.iter().chain(&free).sum();
    tracing::debug!(options = ints.len(), free = free.len(), "summed integers");
    println!("Integers sum = {total}");
    Ok(0)
}

fn run(argv: &[&str]) -> argbind::Result<i32> {
    let mut parser = Parser::with_mode(PROGRAM, "run");
    parser.title("Run an executable");
    parser
        .add(
            Arg::new('e', "executable")
                .required()
                .value_type("FILE")
                .description("Executable to run")
                .handle(|path| println!("Executable: {path}")),
        )?
        .add_help('h', Some("help"))?;
    parser.parse(argv, ErrorPolicy::Exit)
}

fn test(argv: &[&str]) -> argbind::Result<i32> {
    let mut tests = Dispatcher::new(format!("{PROGRAM} test"));
    tests.title("Manage tests");
    tests
        .command("run")?
        .description("Run tests")
        .handle(|_| {
            println!("test run called");
            Ok(0)
        });
    tests
        .command("add")?
        .description("Add new test")
        .handle(|_| {
            println!("test add called");
            Ok(0)
        });
    tests.parse(argv, ErrorPolicy::Exit)
}

fn greet(argv: &[&str]) -> argbind::Result<i32> {
    let mut name = String::new();
    let mut loud = false;
    {
        let mut parser = Parser::with_mode(PROGRAM, "greet");
        parser.title("Say hello");
        parser
            .add(
                Arg::new('n', "name")
                    .store(&mut name)
                    .default_value("world")?
                    .value_type("NAME")
                    .description("who to greet"),
            )?
            .add(Arg::new('l', "loud").switch(&mut loud).description("shout"))?
            .add_help('h', Some("help"))?;
        parser.parse(argv, ErrorPolicy::Exit)?;
    }

    let greeting = format!("Hello, {name}!");
    if loud {
        println!("{}", greeting.to_uppercase());
    } else {
        println!("{greeting}");
    }
    Ok(0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
