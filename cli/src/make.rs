use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Write `makefile` to a temporary file and run `program -f <file> targets...`
/// from `workdir`. Returns the program's exit code.
pub fn run_make(
    program: &str,
    makefile: &str,
    workdir: &Path,
    targets: &[String],
) -> Result<i32, String> {
    let mut file = tempfile::Builder::new()
        .prefix("makedown-")
        .suffix(".mk")
        .tempfile()
        .map_err(|e| format!("cannot create temporary Makefile: {}", e))?;
    file.write_all(makefile.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| format!("cannot write temporary Makefile: {}", e))?;

    tracing::debug!(
        program,
        makefile = %file.path().display(),
        workdir = %workdir.display(),
        ?targets,
        "invoking make"
    );

    let status = Command::new(program)
        .arg("-f")
        .arg(file.path())
        .args(targets)
        .current_dir(workdir)
        .status()
        .map_err(|e| format!("cannot run '{}': {}", program, e))?;

    // Killed by a signal: no code to forward.
    Ok(status.code().unwrap_or(1))
}
