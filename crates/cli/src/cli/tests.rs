use clap::Parser;

use super::*;

#[test]
fn defaults_to_local_config() {
	let cli = Cli::try_parse_from(["tessera", "list"]).unwrap();
	assert_eq!(cli.config, PathBuf::from("tessera.toml"));
	assert!(!cli.verbose);
	assert!(matches!(cli.command, Command::List { kind: Kind::Items }));
}

#[test]
fn pick_parses_stream_and_seed() {
	let cli = Cli::try_parse_from([
		"tessera", "-c", "game/tessera.toml", "pick", "--kind", "structures", "-n", "3", "--stream", "server", "--seed", "9",
	])
	.unwrap();
	let Command::Pick { kind, count, stream, seed } = cli.command else {
		panic!("expected pick");
	};
	assert_eq!((kind, count, stream, seed), (Kind::Structures, 3, Stream::Server, Some(9)));
	assert_eq!(RandSync::from(stream), RandSync::Server);
}

#[test]
fn show_requires_identifier() {
	assert!(Cli::try_parse_from(["tessera", "show"]).is_err());
	let cli = Cli::try_parse_from(["tessera", "show", "wrench", "-k", "spawn-templates"]).unwrap();
	assert!(matches!(cli.command, Command::Show { kind: Kind::SpawnTemplates, .. }));
}
