//! Ansatz command implementation.

use anyhow::{Context, Result};
use console::style;

use molvqe_cli::output::{print_header, print_result, print_section};
use molvqe_compile::{BasisGates, transpile};
use molvqe_core::{AnsatzBuilder, parse_axes};
use molvqe_ir::{Circuit, InstructionKind};

/// Execute the ansatz command.
pub fn execute(
    qubits: usize,
    opening: &str,
    closing: &str,
    show_instructions: bool,
    json: bool,
) -> Result<()> {
    let opening_axes = parse_axes(opening).context("Invalid --opening")?;
    let closing_axes = parse_axes(closing).context("Invalid --closing")?;
    let circuit = AnsatzBuilder::build(qubits, &opening_axes, &closing_axes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&circuit)?);
        return Ok(());
    }

    let translated = transpile(&circuit, BasisGates::u_cx())?;

    print_header(&format!(
        "Ansatz {}",
        AnsatzBuilder::label(&opening_axes, &closing_axes)
    ));
    print_result("Qubits", circuit.num_qubits());
    print_result("Parameters", style(circuit.num_parameters()).yellow());
    print_result("Depth", circuit.depth());
    print_result("Two-qubit gates", translated.num_nonlocal_gates());

    print_section("Gate counts");
    for (name, count) in circuit.count_ops() {
        print_result(&name, count);
    }

    print_section("Parameters");
    for parameter in circuit.parameters() {
        println!("  {parameter}");
    }

    if show_instructions {
        print_section("Instructions");
        print_instructions(&circuit);
    }

    Ok(())
}

fn print_instructions(circuit: &Circuit) {
    for instruction in circuit.instructions() {
        let qubits: Vec<String> = instruction.qubits.iter().map(ToString::to_string).collect();
        match &instruction.kind {
            InstructionKind::Gate(gate) if !gate.parameters().is_empty() => {
                let params: Vec<String> =
                    gate.parameters().iter().map(ToString::to_string).collect();
                println!(
                    "  {}({}) {}",
                    style(gate.name()).cyan(),
                    params.join(", "),
                    qubits.join(", ")
                );
            }
            InstructionKind::Gate(gate) => {
                println!("  {} {}", style(gate.name()).cyan(), qubits.join(", "));
            }
            InstructionKind::Barrier => {
                println!("  {}", style("barrier").dim());
            }
        }
    }
}
