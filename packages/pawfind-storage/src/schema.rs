pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// The rendered schema split into executable statements. Chunks holding only comments are
/// dropped.
pub fn statements() -> Vec<String> {
	render_schema()
		.split(';')
		.filter(|chunk| {
			chunk.lines().map(str::trim).any(|line| !line.is_empty() && !line.starts_with("--"))
		})
		.map(|chunk| chunk.trim().to_string())
		.collect()
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_reference_tables.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_reference_tables.sql")),
				"tables/002_user_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_user_profiles.sql")),
				"tables/003_listings.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_listings.sql")),
				"tables/004_listing_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_listing_images.sql")),
				"tables/005_listing_colors.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_listing_colors.sql")),
				"tables/006_favorites.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_favorites.sql")),
				"tables/007_saved_searches.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_saved_searches.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
