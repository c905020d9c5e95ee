use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use clap::{value_parser, Arg, ArgMatches, Command};
use peershare_core::errors::ListenError;
use peershare_core::utils::Logger;
use peershare_transfer::{add_to_shared, fetch_detached, list_shared, listener, PeerDirs};

pub static LOGGER: Logger = Logger::compact("peershare");

/// Builds the CLI definition for the `peershare` binary.
///
/// # Subcommands
///
/// - **serve**   Start the listening service, print the `ip:port` peers
///   should dial, and keep serving until killed.
///
///   ```bash
///   peershare serve
///   ```
///
/// - **fetch** `--host <IP> --port <PORT> -f <NAME>`   Download one file
///   from a peer into `downloads/` and print the outcome.
///
///   ```bash
///   peershare fetch --host 192.168.1.20 --port 40155 -f notes.txt
///   ```
///
/// - **share** `<PATH>`   Copy a local file into `shared/` so peers can
///   fetch it.
///
/// - **ls**   List the files currently offered.
///
/// The global `-d/--dir` option selects the directory that holds `shared/`
/// and `downloads/` (default: the current directory). Both are created on
/// startup if absent.
///
/// This function only **defines** the CLI structure; `main()` calls
/// `.get_matches()` on the returned `Command`.
pub fn create_command() -> Command {
    Command::new("peershare")
        .about("Share files with peers on the local network")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("BASE_DIR")
                .help("Directory holding shared/ and downloads/")
                .short('d')
                .long("dir")
                .global(true)
                .default_value("."),
        )
        .subcommand(Command::new("serve").about("Serve the shared folder to peers"))
        .subcommand(
            Command::new("fetch")
                .about("Fetch a file from a peer")
                .arg(
                    Arg::new("HOST")
                        .help("Peer IP address")
                        .required(true)
                        .long("host")
                        .value_name("IP"),
                )
                .arg(
                    Arg::new("PORT")
                        .help("Peer port")
                        .required(true)
                        .long("port")
                        .value_name("PORT")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("FILE_NAME")
                        .help("Name of the file to fetch")
                        .required(true)
                        .short('f')
                        .long("file")
                        .value_name("NAME"),
                ),
        )
        .subcommand(
            Command::new("share").about("Add a file to the shared folder").arg(
                Arg::new("FILE_PATH")
                    .help("Path to the file to share")
                    .required(true)
                    .value_name("PATH"),
            ),
        )
        .subcommand(Command::new("ls").about("List shared files"))
}

pub fn run(matches: &ArgMatches) -> io::Result<()> {
    let base = PathBuf::from(matches.get_one::<String>("BASE_DIR").unwrap());
    let dirs = PeerDirs::under(&base);
    dirs.bootstrap()?;

    match matches.subcommand() {
        Some(("serve", _)) => serve(dirs),
        Some(("fetch", sub)) => fetch(sub, dirs),
        Some(("share", sub)) => share(sub, dirs),
        Some(("ls", _)) => ls(dirs),
        _ => unreachable!("subcommand_required"),
    }
}

fn serve(dirs: PeerDirs) -> io::Result<()> {
    let handle = match listener::start(dirs.share_root, |ip, port| {
        LOGGER.info(format!("Your details: IP - {} | Port - {}", ip, port));
    }) {
        Ok(handle) => handle,
        Err(ListenError::Bind(e)) => return Err(e),
    };

    // Serves until the process is killed.
    handle.join().ok();
    Ok(())
}

fn fetch(sub: &ArgMatches, dirs: PeerDirs) -> io::Result<()> {
    let host = sub.get_one::<String>("HOST").unwrap().clone();
    let port = *sub.get_one::<u16>("PORT").unwrap();
    let name = sub.get_one::<String>("FILE_NAME").unwrap().clone();

    LOGGER.debug(format!("fetch '{}' from {}:{}", name, host, port));
    let (tx, rx) = mpsc::channel();
    let handle = fetch_detached(host, port, name, dirs.download_root, move |message| {
        tx.send(message).ok();
    });

    if let Ok(message) = rx.recv() {
        LOGGER.info(message);
    }
    handle.join().ok();
    Ok(())
}

fn share(sub: &ArgMatches, dirs: PeerDirs) -> io::Result<()> {
    let path = PathBuf::from(sub.get_one::<String>("FILE_PATH").unwrap());
    if !path.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "File does not exist!",
        ));
    }

    match add_to_shared(&path, &dirs.share_root)? {
        Some(name) => LOGGER.info(format!("File '{}' added to shared folder.", name)),
        None => LOGGER.info("A file with that name is already shared."),
    }
    Ok(())
}

fn ls(dirs: PeerDirs) -> io::Result<()> {
    LOGGER.info("Shared files:");
    for name in list_shared(&dirs.share_root)? {
        println!("\t{}", name);
    }
    Ok(())
}
