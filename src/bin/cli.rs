use std::error::Error;
use std::process;

use clap::Parser;
use colored::Colorize;
use hyperexpr::prelude::*;

#[derive(Parser)]
#[command(name = "hyperexpr")]
#[command(about = "Evaluate, differentiate and integrate hyperbolic expressions")]
#[command(version)]
struct Args {
    /// Expression as whitespace separated tokens, e.g. "( ( x Sh ) 2 * )"
    expression: String,

    /// Variable binding NAME=VALUE, may be repeated
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,

    /// Differentiate with respect to this variable at the bound point
    #[arg(short, long, value_name = "NAME", conflicts_with = "integrate")]
    diff: Option<String>,

    /// Integrate between two bounds
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["LOWER", "UPPER"],
        allow_negative_numbers = true
    )]
    integrate: Option<Vec<f64>>,

    /// Quadrature step used with --integrate
    #[arg(long, requires = "integrate")]
    step: Option<f64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let equation = Equation::new(&args.expression)?;
    let bindings: VariableMap = args.vars.iter().cloned().collect();

    println!("{}: {}", "Expression".cyan(), equation);
    println!("{}: {}", "Variables".cyan(), equation.variables().join(", "));
    println!(
        "{}: {}  {}: {}  {}: {}",
        "Nodes".cyan(),
        equation.ast().size(),
        "Constant".cyan(),
        equation.is_constant(),
        "Polynomial".cyan(),
        equation.is_polynomial()
    );

    if let Some(variable) = &args.diff {
        let derivative = equation.derivative(variable, &bindings)?;
        println!("{}: {}", "Derivative".cyan(), derivative);
        println!("{}: {}", "Value".green().bold(), derivative.eval(&bindings)?);
    } else if let Some(bounds) = &args.integrate {
        let [lower, upper] = bounds[..] else {
            return Err("--integrate takes exactly two bounds".into());
        };
        let area = match args.step {
            Some(step) => LeftRiemann::new(step)?.integrate(equation.ast(), lower, upper)?,
            None => equation.integrate(lower, upper)?,
        };
        println!("{}: {}", "Integral".green().bold(), area);
    } else {
        let missing = equation.missing_variables(&bindings);
        if !missing.is_empty() {
            return Err(format!("no value given for: {}", missing.join(", ")).into());
        }
        println!("{}: {}", "Value".green().bold(), equation.eval(&bindings)?);
    }

    Ok(())
}

/// Parses a `NAME=VALUE` binding.
fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for `{name}`: {e}"))?;
    Ok((name.trim().to_string(), value))
}
