use rol_core::acquisition::AcquireReport;
use rol_core::outcome::{Outcome, Status};
use rol_core::transform::ProcessReport;

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Success => "ok",
        Status::Error => "error",
    }
}

pub fn print_acquired(outcome: &Outcome<AcquireReport>) {
    println!("[{}] {}", status_label(outcome.status), outcome.message);
    if let Some(ref report) = outcome.payload {
        println!("  Archive:   {}", report.zip_file_path);
        println!("  Extracted: {}", report.extracted_files_path);
        for doc in &report.documents {
            println!("    {doc}");
        }
    }
}

pub fn print_processed(outcome: &Outcome<ProcessReport>) {
    println!("[{}] {}", status_label(outcome.status), outcome.message);
    if let Some(ref report) = outcome.payload {
        println!("  Output:        {}", report.zip_path);
        println!("  Rows:          {}", report.rows);
        println!("  Substitutions: {}", report.substitutions);
    }
}

pub fn print_files(files: &[String]) {
    if files.is_empty() {
        println!("(empty)");
        return;
    }
    for name in files {
        println!("{name}");
    }
}
