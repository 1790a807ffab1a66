use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = pawfind_api::Args::parse();

	pawfind_api::run(args).await
}
