// lt-paradigm: list the paradigm cells of a compiled transducer.
//
// Reads one query pattern per line and prints every matching
// `analysis:surface` pair.
//
// Usage:
//   lt-paradigm [-a] [-s] [-e TAG]... [-z] [-v...] [-q] FST [INPUT [OUTPUT]]
//
// Examples:
//   echo 'ab<n><*>' | lt-paradigm dict.bin
//   echo '*<n><*>' | lt-paradigm -a -s -e ind dict.bin

use clap::Parser;

use lttb_cli::ParadigmArgs;

fn main() {
    let args = ParadigmArgs::parse();
    lttb_cli::init_logging(args.verbosity());

    if let Err(e) = lttb_cli::run(&args) {
        lttb_cli::fatal(&e);
    }
}
