use colored::Colorize;
use rdfweave_graph_format::Syntax;

pub fn run() {
    println!(
        "{:<10} {:<22} {:<16} {}",
        "NAME".bold(),
        "MEDIA TYPE".bold(),
        "EXTENSIONS".bold(),
        "MODES".bold()
    );
    for syntax in Syntax::ALL {
        let modes = if syntax.is_readable() { "read, write" } else { "write" };
        println!(
            "{:<10} {:<22} {:<16} {}",
            syntax.name(),
            syntax.media_type(),
            syntax.extensions().join(", "),
            modes
        );
    }
}
