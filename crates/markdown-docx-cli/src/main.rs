use std::process;

fn main() {
    match markdown_docx_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-docx error: {err:#}");
            process::exit(1);
        }
    }
}
