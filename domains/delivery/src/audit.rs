//! Static audit of a project's files
//!
//! A fixed table of sixteen rules, each a predicate over an [`Inventory`]
//! built once per audit. Rules never fail outright on bad input: a malformed
//! `package.json` simply counts as absent.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{is_test_file, is_typescript, Manifest};
use crate::domain::entities::{
    AuditCategory, AuditCheck, AuditResult, CheckStatus, Impact, SourceFile,
};

lazy_static! {
    static ref SECRET_REGEX: Regex = Regex::new(
        r#"(?i)(api[_-]?key|secret|token|password)\s*[:=]\s*["']?[^\s"']{8,}|sk-[A-Za-z0-9]{20,}"#
    )
    .unwrap();
    static ref DANGEROUS_CALL_REGEX: Regex =
        Regex::new(r"eval\(|new Function\(|dangerouslySetInnerHTML|\.innerHTML\s*=").unwrap();
    static ref HTTP_URL_REGEX: Regex = Regex::new(r"http://([A-Za-z0-9.\-]+)").unwrap();
    static ref IMG_TAG_REGEX: Regex = Regex::new(r"(?is)<img\b[^>]*>").unwrap();
    static ref LOADING_ATTR_REGEX: Regex = Regex::new(r"(?i)\sloading\s*=").unwrap();
    static ref ALT_ATTR_REGEX: Regex = Regex::new(r"(?i)\salt\s*=").unwrap();
    static ref HTML_LANG_REGEX: Regex = Regex::new(r"(?is)<html\b[^>]*\slang\s*=").unwrap();
    static ref META_DESCRIPTION_REGEX: Regex =
        Regex::new(r#"(?i)<meta\s+name\s*=\s*["']description["']"#).unwrap();
    static ref TITLE_REGEX: Regex = Regex::new(r"(?i)<title\b[^>]*>").unwrap();
}

/// Files above this size are flagged by `perf-001`
pub const LARGE_FILE_BYTES: usize = 100_000;

/// Extensions scanned for risky calls and debug logging
const CODE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "vue", "svelte", "html", "htm",
];

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Facts gathered once and shared by every rule
struct Inventory<'a> {
    files: &'a [SourceFile],
    manifest: Manifest,
    img_tags: Vec<&'a str>,
}

impl<'a> Inventory<'a> {
    fn new(files: &'a [SourceFile]) -> Self {
        let img_tags = files
            .iter()
            .flat_map(|f| IMG_TAG_REGEX.find_iter(&f.content))
            .map(|m| m.as_str())
            .collect();

        Self {
            files,
            manifest: Manifest::read(files),
            img_tags,
        }
    }

    fn any_named(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.files.iter().any(|f| predicate(f.name()))
    }

    fn any_content(&self, regex: &Regex) -> bool {
        self.files.iter().any(|f| regex.is_match(&f.content))
    }

    fn code_files(&self) -> impl Iterator<Item = &'a SourceFile> {
        self.files.iter().filter(|f| f.has_extension(CODE_EXTENSIONS))
    }
}

/// One row of the audit table
struct Rule {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AuditCategory,
    impact: Impact,
    /// Status reported when the predicate does not hold
    on_miss: CheckStatus,
    recommendation: &'static str,
    passes: fn(&Inventory) -> bool,
}

impl Rule {
    fn evaluate(&self, inventory: &Inventory) -> AuditCheck {
        let status = if (self.passes)(inventory) {
            CheckStatus::Pass
        } else {
            self.on_miss
        };

        AuditCheck {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            status,
            impact: self.impact,
            recommendation: (status != CheckStatus::Pass).then_some(self.recommendation),
        }
    }
}

const RULES: &[Rule] = &[
    Rule {
        id: "sec-001",
        name: "No committed environment file",
        description: "A .env file holds local secrets and must not ship with the project",
        category: AuditCategory::Security,
        impact: Impact::High,
        on_miss: CheckStatus::Fail,
        recommendation: "Remove .env files and configure secrets on the hosting platform",
        passes: no_env_file,
    },
    Rule {
        id: "sec-002",
        name: "No hardcoded secrets",
        description: "API keys, tokens and passwords must not appear in source",
        category: AuditCategory::Security,
        impact: Impact::Critical,
        on_miss: CheckStatus::Fail,
        recommendation: "Move hardcoded credentials into environment variables and rotate them",
        passes: no_hardcoded_secrets,
    },
    Rule {
        id: "sec-003",
        name: "No dynamic code execution",
        description: "eval, new Function and raw innerHTML assignment open the door to injection",
        category: AuditCategory::Security,
        impact: Impact::High,
        on_miss: CheckStatus::Warn,
        recommendation: "Replace eval and raw HTML injection with safe alternatives",
        passes: no_dangerous_calls,
    },
    Rule {
        id: "sec-004",
        name: "Secure connections",
        description: "Remote resources should be loaded over HTTPS",
        category: AuditCategory::Security,
        impact: Impact::Medium,
        on_miss: CheckStatus::Warn,
        recommendation: "Use https:// for all external URLs",
        passes: no_insecure_urls,
    },
    Rule {
        id: "sec-005",
        name: "Git ignore file",
        description: "A .gitignore keeps build output and local files out of version control",
        category: AuditCategory::Security,
        impact: Impact::Medium,
        on_miss: CheckStatus::Warn,
        recommendation: "Add a .gitignore covering node_modules, build output and .env files",
        passes: has_gitignore,
    },
    Rule {
        id: "perf-001",
        name: "Reasonable file sizes",
        description: "Very large files slow down loading and editing",
        category: AuditCategory::Performance,
        impact: Impact::Medium,
        on_miss: CheckStatus::Warn,
        recommendation: "Split or compress files larger than 100 KB",
        passes: no_large_files,
    },
    Rule {
        id: "perf-002",
        name: "Lazy-loaded images",
        description: "Images should declare a loading strategy",
        category: AuditCategory::Performance,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Add loading=\"lazy\" to images below the fold",
        passes: images_lazy_loaded,
    },
    Rule {
        id: "a11y-001",
        name: "Image alternative text",
        description: "Every image needs alt text for screen readers",
        category: AuditCategory::Accessibility,
        impact: Impact::Medium,
        on_miss: CheckStatus::Fail,
        recommendation: "Add descriptive alt attributes to all images",
        passes: images_have_alt,
    },
    Rule {
        id: "a11y-002",
        name: "Document language",
        description: "HTML documents should declare their language",
        category: AuditCategory::Accessibility,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Add a lang attribute to the <html> element",
        passes: html_declares_lang,
    },
    Rule {
        id: "bp-001",
        name: "README present",
        description: "A README explains how to run and deploy the project",
        category: AuditCategory::BestPractices,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Add a README with setup and deployment instructions",
        passes: has_readme,
    },
    Rule {
        id: "bp-002",
        name: "Automated tests",
        description: "Tests catch regressions before users do",
        category: AuditCategory::BestPractices,
        impact: Impact::Medium,
        on_miss: CheckStatus::Warn,
        recommendation: "Add automated tests for critical functionality",
        passes: has_tests,
    },
    Rule {
        id: "bp-003",
        name: "No debug logging",
        description: "console.log calls should not reach production",
        category: AuditCategory::BestPractices,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Remove console.log statements or use a proper logger",
        passes: no_console_log,
    },
    Rule {
        id: "seo-001",
        name: "Meta description",
        description: "Search engines use the meta description in results",
        category: AuditCategory::Seo,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Add a <meta name=\"description\"> tag",
        passes: has_meta_description,
    },
    Rule {
        id: "seo-002",
        name: "Page title",
        description: "Every site needs a descriptive <title>",
        category: AuditCategory::Seo,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Add a <title> tag to your pages",
        passes: has_title,
    },
    Rule {
        id: "cq-001",
        name: "Type safety",
        description: "TypeScript catches whole classes of bugs at build time",
        category: AuditCategory::CodeQuality,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Consider migrating to TypeScript",
        passes: uses_typescript,
    },
    Rule {
        id: "cq-002",
        name: "Linting and formatting",
        description: "A linter or formatter keeps the codebase consistent",
        category: AuditCategory::CodeQuality,
        impact: Impact::Low,
        on_miss: CheckStatus::Warn,
        recommendation: "Set up ESLint, Prettier or Biome",
        passes: has_lint_config,
    },
];

fn no_env_file(inv: &Inventory) -> bool {
    !inv.any_named(|name| name == ".env")
}

fn no_hardcoded_secrets(inv: &Inventory) -> bool {
    !inv.any_content(&SECRET_REGEX)
}

fn no_dangerous_calls(inv: &Inventory) -> bool {
    !inv.code_files().any(|f| DANGEROUS_CALL_REGEX.is_match(&f.content))
}

fn no_insecure_urls(inv: &Inventory) -> bool {
    !inv.files.iter().any(|f| {
        HTTP_URL_REGEX
            .captures_iter(&f.content)
            .any(|caps| !LOCAL_HOSTS.contains(&&caps[1]))
    })
}

fn has_gitignore(inv: &Inventory) -> bool {
    inv.any_named(|name| name == ".gitignore")
}

fn no_large_files(inv: &Inventory) -> bool {
    inv.files.iter().all(|f| f.content.len() <= LARGE_FILE_BYTES)
}

fn images_lazy_loaded(inv: &Inventory) -> bool {
    inv.img_tags.iter().all(|tag| LOADING_ATTR_REGEX.is_match(tag))
}

fn images_have_alt(inv: &Inventory) -> bool {
    inv.img_tags.iter().all(|tag| ALT_ATTR_REGEX.is_match(tag))
}

fn html_declares_lang(inv: &Inventory) -> bool {
    inv.files
        .iter()
        .filter(|f| f.has_extension(&["html", "htm"]))
        .all(|f| HTML_LANG_REGEX.is_match(&f.content))
}

fn has_readme(inv: &Inventory) -> bool {
    inv.any_named(|name| name.to_ascii_uppercase().starts_with("README"))
}

fn has_tests(inv: &Inventory) -> bool {
    inv.files.iter().any(|f| is_test_file(&f.path))
}

fn no_console_log(inv: &Inventory) -> bool {
    !inv.code_files().any(|f| f.content.contains("console.log("))
}

fn has_meta_description(inv: &Inventory) -> bool {
    inv.any_content(&META_DESCRIPTION_REGEX)
}

fn has_title(inv: &Inventory) -> bool {
    inv.any_content(&TITLE_REGEX)
}

fn uses_typescript(inv: &Inventory) -> bool {
    inv.files.iter().any(is_typescript) || inv.manifest.depends_on("typescript")
}

fn has_lint_config(inv: &Inventory) -> bool {
    inv.any_named(|name| {
        name.starts_with(".eslintrc")
            || name.starts_with("eslint.config.")
            || name.starts_with(".prettierrc")
            || name.starts_with("prettier.config.")
            || name.starts_with("biome.json")
    }) || inv.manifest.depends_on("eslint")
}

/// Mean check weight, rounded; an empty project scores 100
fn score(files: &[SourceFile], checks: &[AuditCheck]) -> u8 {
    if files.is_empty() || checks.is_empty() {
        return 100;
    }
    let total: u32 = checks.iter().map(|c| c.status.weight()).sum();
    let mean = f64::from(total) / checks.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

/// Run every rule over the files
pub fn audit(files: &[SourceFile]) -> AuditResult {
    let inventory = Inventory::new(files);
    let checks: Vec<AuditCheck> = RULES.iter().map(|r| r.evaluate(&inventory)).collect();

    let count = |status: CheckStatus| checks.iter().filter(|c| c.status == status).count();
    let suggestions = [CheckStatus::Fail, CheckStatus::Warn]
        .into_iter()
        .flat_map(|status| {
            checks
                .iter()
                .filter(move |c| c.status == status)
                .filter_map(|c| c.recommendation.map(str::to_string))
        })
        .collect();

    AuditResult {
        score: score(files, &checks),
        passed: count(CheckStatus::Pass),
        warnings: count(CheckStatus::Warn),
        failed: count(CheckStatus::Fail),
        suggestions,
        checks,
    }
}
