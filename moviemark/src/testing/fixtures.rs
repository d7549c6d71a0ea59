//! HTML fixtures for extractor and parser tests.

/// A page with full OpenGraph metadata and a relative `og:image`.
pub const OPENGRAPH_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Blade Runner (1982) - Movie Archive</title>
  <meta property="og:title" content="Blade Runner">
  <meta property="og:description" content="A blade runner must pursue replicants.">
  <meta name="description" content="Archive entry for Blade Runner.">
  <meta property="og:image" content="/img/blade-runner.jpg">
</head>
<body>
  <img src="/static/logo.svg" alt="Movie Archive">
  <img src="/img/still-01.jpg" alt="Still">
</body>
</html>"#;

/// A page with a description and images but no title of any kind.
pub const TITLELESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta name="description" content="A page that forgot its title.">
</head>
<body>
  <img src="/poster.jpg">
</body>
</html>"#;

/// Markup with unclosed and misnested tags.
pub const BROKEN_PAGE: &str = r#"<html><head><title>Broken But Fine | Site</title>
<body><div><p>unclosed <b>bold <i>italic</b></i>
<img src="/brand-logo.png"><img src=/still-found.jpg>
</table></span><div"#;
