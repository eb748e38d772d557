use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = collect_hints(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Option<Vec<String>> {
    let mut hints = Vec::new();

    if let Some(pipeline_err) = err.downcast_ref::<dock_flow::PipelineError>() {
        collect_pipeline_hints(pipeline_err, &mut hints);
    } else if err.downcast_ref::<dock_flow::config::Error>().is_some() {
        hints.push("Check the configuration TOML syntax".to_string());
        hints.push(
            "Both [binaries] and [parameters] tables are required; see the bundled config.toml"
                .to_string(),
        );
    }

    if hints.is_empty() {
        None
    } else {
        Some(hints)
    }
}

fn collect_pipeline_hints(err: &dock_flow::PipelineError, hints: &mut Vec<String>) {
    use dock_flow::PipelineError;

    match err {
        PipelineError::MissingInput(path) => {
            hints.push(format!("'{}' must exist before the stage runs", path.display()));
            hints.push("An earlier stage may have been removed or its output deleted".to_string());
            hints.push("Rerun with --recalc to rebuild intermediate results".to_string());
        }

        PipelineError::MissingOutput(path) => {
            hints.push(format!(
                "The tool exited successfully but '{}' was not written",
                path.display()
            ));
            hints.push("Inspect the tool output above for warnings".to_string());
            hints.push("A partially written run directory can be deleted safely".to_string());
        }

        PipelineError::Exec(exec_err) => {
            use dock_flow::exec::Error as ExecError;
            match exec_err {
                ExecError::Spawn { program, .. } => {
                    hints.push(format!("'{}' could not be started", program));
                    hints.push(
                        "Check the [binaries] section of the configuration and your PATH"
                            .to_string(),
                    );
                }
                ExecError::NonZeroExit { program, .. } => {
                    hints.push(format!("'{}' failed; its combined output is shown above", program));
                    hints.push("Check the rendered deck in the stage output directory".to_string());
                }
            }
        }

        PipelineError::Template(template_err) => {
            use dock_flow::template::Error as TemplateError;
            if let TemplateError::UnsupportedFeature { placeholder } = template_err {
                hints.push(format!(
                    "The deck template does not declare a '{{{placeholder}}}' placeholder"
                ));
                hints.push(
                    "Use a deck that supports the requested capability, or drop the option"
                        .to_string(),
                );
            } else {
                hints.push("Check the deck template for malformed placeholders".to_string());
            }
        }

        PipelineError::LinkerNotFound(_) | PipelineError::MultipleLinkers(_) => {
            hints.push("The template must contain exactly one Du linker atom".to_string());
        }

        PipelineError::LinkerBondNotFound(_) | PipelineError::MultipleLinkerBonds(_) => {
            hints.push("The linker must be bonded to exactly one atom".to_string());
        }

        PipelineError::AnchorNotFound(_) | PipelineError::MultipleAnchorMatches(_) => {
            hints.push(
                "Anchor matching compares coordinate text; template and ligand must come from the same conformer"
                    .to_string(),
            );
            hints.push("Re-export both files with identical coordinate formatting".to_string());
        }

        PipelineError::Mol2(_) => {
            hints.push("Verify the @<TRIPOS>ATOM and @<TRIPOS>BOND sections".to_string());
        }

        _ => {}
    }
}
