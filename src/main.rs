use biocompress::options::{Options, STD_OPTIONS};
use clap::{arg, crate_version, Command};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help =
"Examples:
---------
Compress:      `biocompress compress -i my_sequence.txt -o my_sequence.bc`
Expand:        `biocompress expand -i my_sequence.bc -o my_sequence.txt`";

    let mut main_cmd = Command::new("biocompress")
        .about("Lossless compression of DNA sequences over {A,C,T,G}")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .arg(arg!(-H --height <HEIGHT> "k-mer index depth").value_parser(clap::value_parser!(usize)))
            .about("compress a raw {A,C,T,G} text file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("expand")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("expand a compressed file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let height = cmd.get_one::<usize>("height").copied().unwrap_or(STD_OPTIONS.height);
        biocompress::encode_file(path_in, path_out, &Options { height })?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        biocompress::decode_file(path_in, path_out)?;
    }

    Ok(())
}
