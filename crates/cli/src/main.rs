use std::io;

use peershare_cli::{create_command, run};

fn main() -> io::Result<()> {
    let matches = create_command().get_matches();

    run(&matches)
}
