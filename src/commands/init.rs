//! Initialize a new content site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::{SiteConfig, CONFIG_FILE};

const CONFIG_TEMPLATE: &str = r#"# folio configuration

# Directory
posts_dir: content/md/posts
pages_dir: content/md/pages
extensions:
  - md
  - markdown
exclude: []

# Writing
layouts:
  - page
  - post
new_post_name: ":year-:month-:day-:title.md"
new_page_name: ":title.md"
"#;

const SAMPLE_PAGE: &str = r#"{:title "About"
 :layout :page
 :page-index 0
 :navbar? true}

### About this site

Pages open with an EDN map naming their title, layout, position and
whether they appear in the navigation bar.
"#;

const SAMPLE_POST: &str = r#"{:title "Hello World"
 :layout :post
 :tags ["meta"]}

Posts are named `YYYY-MM-DD-slug.md`. The date and slug come from the
file name; the title, layout and tags come from the map above.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    let config = SiteConfig::default();
    let posts_dir = target_dir.join(&config.posts_dir);
    let pages_dir = target_dir.join(&config.pages_dir);

    // Create directory structure
    fs::create_dir_all(&posts_dir)?;
    fs::create_dir_all(&pages_dir)?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let today = chrono::Local::now().date_naive();
    fs::write(pages_dir.join("about.md"), SAMPLE_PAGE)?;
    fs::write(
        posts_dir.join(format!("{}-hello-world.md", today.format("%Y-%m-%d"))),
        SAMPLE_POST,
    )?;

    Ok(())
}
