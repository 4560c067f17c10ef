use crate::application::dto::{
    BuildLogInput, InterpreterPromotion, ManifestScan, PackageIndexInput, ProjectProfile,
    SbomResponse, TreeScan,
};
use crate::ports::outbound::{PackageIndexClient, ProgressReporter, SourceFiles};
use crate::sbom_generation::domain::{BuildInfo, Dependency, DependencySet, ReleaseInfo};
use crate::sbom_generation::parsers::{
    fallback_packages, index_url, manifest_candidates, parse_build_log, parse_colon_entries,
    parse_exact_pins, parse_find_package_calls, parse_package_filters, parse_package_index,
    parse_pinned_requirements, parse_source_tarballs, DiscoveredEntry, EntryOrigin, MetaPackage,
    MetaPackageKind, PairingStrategy, MANIFEST_FILE_NAME,
};
use crate::sbom_generation::policies::{ExtractionRules, MatchStrategy};
use crate::sbom_generation::services::{
    interpreter_entry, MatchKind, Reconciler, SbomGenerator, SideFileLedger,
};
use crate::shared::security::validate_path_segment;
use crate::shared::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Source tag of records found by scanning a source tree for pinned requirements
const TREE_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Outcome of scanning a set of package directories
#[derive(Debug, Default)]
struct ScanResult {
    entries: Vec<DiscoveredEntry>,
    unresolved: Vec<String>,
}

/// GenerateSbomUseCase - collects every dependency of one project
///
/// Reads the build log, reconciles the expected packages against the remote
/// package index, falls back to a secondary manifest tree for what the index
/// lacks, scans build manifests and supplementary files, and returns the
/// deduplicated set. Nothing is written except the append-only side files.
///
/// # Type Parameters
/// * `S` - SourceFiles implementation
/// * `I` - PackageIndexClient implementation
/// * `R` - ProgressReporter implementation
pub struct GenerateSbomUseCase<S, I, R> {
    sources: S,
    index_client: I,
    progress_reporter: R,
}

impl<S, I, R> GenerateSbomUseCase<S, I, R>
where
    S: SourceFiles,
    I: PackageIndexClient,
    R: ProgressReporter,
{
    pub fn new(sources: S, index_client: I, progress_reporter: R) -> Self {
        Self {
            sources,
            index_client,
            progress_reporter,
        }
    }

    /// Executes the collection for `profile`
    ///
    /// Records are merged in a fixed order and never overwritten: package
    /// index, secondary lookup, meta-package sub-packages, pinned requirements,
    /// side files, source-tree scan.
    pub async fn execute(&self, profile: &ProjectProfile) -> Result<SbomResponse> {
        self.progress_reporter
            .report(&format!("🚀 Collecting dependencies for {}", profile.name));

        let build_info = match &profile.build_log {
            Some(input) => self.read_build_log(input)?,
            None => BuildInfo::default(),
        };

        let mut dependencies = DependencySet::new();

        if let Some(index) = &profile.package_index {
            let records = self.collect_from_index(index, &build_info).await?;
            dependencies.extend(records);
        }

        let mut side_files = profile.side_files.clone();
        if let Some(scan) = &profile.manifest_scan {
            let records = self.collect_from_manifests(scan)?;
            dependencies.extend(records);
            if let Some(side_file) = &scan.side_file {
                if !side_files.contains(side_file) {
                    side_files.push(side_file.clone());
                }
            }
        }

        if let Some(promotion) = &profile.interpreter_promotion {
            self.promote_interpreter(promotion)?;
        }

        for path in &profile.requirements {
            let records = self.read_list_file(path, "requirements file", parse_pinned_requirements)?;
            dependencies.extend(records);
        }
        for path in &side_files {
            let records = self.read_list_file(path, "side file", parse_colon_entries)?;
            dependencies.extend(records);
        }

        if let Some(tree) = &profile.tree_scan {
            dependencies.extend(self.scan_tree(tree)?);
        }

        self.report_summary(&dependencies);

        let metadata = SbomGenerator::generate_metadata(
            &profile.tool_name,
            &profile.tool_version,
            profile.properties.clone(),
        );

        Ok(SbomResponse::new(dependencies, build_info, metadata))
    }

    fn read_build_log(&self, input: &BuildLogInput) -> Result<BuildInfo> {
        self.progress_reporter.report(&format!(
            "📖 Loading build log from: {}",
            input.path.display()
        ));

        match self.sources.read_optional(&input.path)? {
            Some(content) => {
                let info = parse_build_log(&content, input.platform_line);
                self.progress_reporter.report(&format!(
                    "✅ Build log lists {} package(s)",
                    info.packages.len()
                ));
                Ok(info)
            }
            None => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Build log not found: {}",
                    input.path.display()
                ));
                Ok(BuildInfo::default())
            }
        }
    }

    /// Every package the index lists, under its listed name, plus secondary
    /// lookup records for expected packages the index does not list.
    async fn collect_from_index(
        &self,
        index: &PackageIndexInput,
        build_info: &BuildInfo,
    ) -> Result<Vec<Dependency>> {
        let listed = match &build_info.release {
            Some(release) => self.load_index(index, release).await?,
            None => {
                self.progress_reporter.report_error(
                    "⚠️  Warning: Build log has no release line; skipping package index",
                );
                BTreeMap::new()
            }
        };

        let mut records: Vec<Dependency> = listed
            .iter()
            .filter_map(|(name, version)| {
                Dependency::new(name.as_str(), Some(version.clone()), index.source_tag.as_str())
                    .ok()
            })
            .collect();
        if !listed.is_empty() {
            self.progress_reporter.report(&format!(
                "✅ Package index lists {} package(s)",
                records.len()
            ));
        }

        let expected = &build_info.packages;
        if expected.is_empty() {
            self.progress_reporter
                .report("ℹ️  No expected packages in the build log; skipping missing-package check");
            return Ok(records);
        }

        for name in expected {
            if let Some((listed_name, MatchKind::Alias)) =
                Reconciler::match_name(name, &listed, &index.aliases)
            {
                self.progress_reporter
                    .report(&format!("🔗 {} is listed as {}", name, listed_name));
            }
        }

        let missing = Reconciler::find_missing(expected, &listed, &index.aliases);
        self.progress_reporter.report(&format!(
            "✅ Matched {} of {} expected package(s) in the package index",
            expected.len() - missing.len(),
            expected.len()
        ));

        if missing.is_empty() {
            return Ok(records);
        }

        let Some(secondary) = &index.secondary else {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Not in the package index: {}",
                missing.join(", ")
            ));
            return Ok(records);
        };

        self.progress_reporter.report(&format!(
            "🔍 Looking up {} missing package(s) in {}",
            missing.len(),
            secondary.package_root.display()
        ));
        let scan = self.scan_packages(
            &missing,
            &secondary.package_root,
            &secondary.rules,
            &secondary.meta_packages,
        )?;
        if !scan.unresolved.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Could not resolve: {}",
                scan.unresolved.join(", ")
            ));
        }
        records.extend(
            scan.entries
                .into_iter()
                .filter_map(|e| e.into_dependency(&secondary.source_tag)),
        );

        Ok(records)
    }

    /// Fetches and parses the index page, falling back to the cached copy.
    async fn load_index(
        &self,
        index: &PackageIndexInput,
        release: &ReleaseInfo,
    ) -> Result<BTreeMap<String, String>> {
        if let Err(e) = validate_path_segment(&release.version, "Release identifier")
            .and_then(|_| validate_path_segment(&release.platform, "Platform"))
        {
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: {}; skipping package index", e));
            return Ok(BTreeMap::new());
        }

        let url = index_url(&index.url_template, &release.version, &release.platform);
        self.progress_reporter
            .report(&format!("🌐 Fetching package index: {}", url));

        let html = match self.index_client.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                self.progress_reporter
                    .report_error(&format!("⚠️  Warning: {:#}", e));
                self.read_cached_index(index)?
            }
        };

        let parsed = parse_package_index(&html, &index.table_id);
        if !parsed.table_found && !html.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: No table with id \"{}\" on the package index page",
                index.table_id
            ));
        }
        if parsed.strategy == Some(PairingStrategy::Positional) {
            self.progress_reporter.report_error(
                "⚠️  Warning: Package index rows could not be paired; names and versions were matched by position",
            );
        }
        Ok(parsed.packages)
    }

    fn read_cached_index(&self, index: &PackageIndexInput) -> Result<String> {
        let Some(cache_file) = &index.cache_file else {
            return Ok(String::new());
        };
        match self.sources.read_optional(cache_file)? {
            Some(html) => {
                self.progress_reporter.report(&format!(
                    "📦 Using cached package index: {}",
                    cache_file.display()
                ));
                Ok(html)
            }
            None => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Cached package index not found: {}",
                    cache_file.display()
                ));
                Ok(String::new())
            }
        }
    }

    /// Scans the filter-listed packages. Meta-package sub-packages become
    /// records here; other entries go through the side file when one is
    /// configured, otherwise they become records tagged with the manifest name.
    fn collect_from_manifests(&self, scan: &ManifestScan) -> Result<Vec<Dependency>> {
        let names = self.read_filter_list(&scan.filter_files)?;
        let result =
            self.scan_packages(&names, &scan.package_root, &scan.rules, &scan.meta_packages)?;

        if !result.unresolved.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: No version found for: {}",
                result.unresolved.join(", ")
            ));
        }

        if let Some(side_file) = &scan.side_file {
            let existing = self.sources.read_optional(side_file)?;
            let mut ledger = SideFileLedger::new(existing.as_deref());
            for entry in &result.entries {
                ledger.record(&entry.side_file_line());
            }
            let pending = ledger.take_pending();
            if !pending.is_empty() {
                self.sources.append_lines(side_file, &pending)?;
                self.progress_reporter.report(&format!(
                    "📝 Appended {} new entr{} to {}",
                    pending.len(),
                    if pending.len() == 1 { "y" } else { "ies" },
                    side_file.display()
                ));
            }
        }

        let through_side_file = scan.side_file.is_some();
        Ok(result
            .entries
            .into_iter()
            .filter(|e| !through_side_file || matches!(e.origin, EntryOrigin::MetaPackage(_)))
            .filter_map(|e| e.into_dependency(MANIFEST_FILE_NAME))
            .collect())
    }

    fn read_filter_list(&self, candidates: &[PathBuf]) -> Result<Vec<String>> {
        for path in candidates {
            if let Some(content) = self.sources.read_optional(path)? {
                let names = parse_package_filters(&content);
                self.progress_reporter.report(&format!(
                    "📋 Read {} package filter(s) from {}",
                    names.len(),
                    path.display()
                ));
                return Ok(names);
            }
        }
        self.progress_reporter.report_error(
            "⚠️  Warning: No package filter file found; using the built-in package list",
        );
        Ok(fallback_packages())
    }

    fn scan_packages(
        &self,
        names: &[String],
        package_root: &Path,
        rules: &ExtractionRules,
        meta_packages: &[MetaPackage],
    ) -> Result<ScanResult> {
        let mut result = ScanResult::default();
        let total = names.len();

        for (idx, name) in names.iter().enumerate() {
            self.progress_reporter
                .report_progress(idx + 1, total, Some(name.as_str()));

            if validate_path_segment(name, "Package name").is_err() {
                result.unresolved.push(name.clone());
                continue;
            }
            let package_dir = package_root.join(name);

            if let Some(meta) = meta_packages.iter().find(|m| &m.name == name) {
                if self.sources.is_dir(&package_dir) {
                    let found = self.scan_meta_package(meta, &package_dir)?;
                    if found.is_empty() {
                        result.unresolved.push(name.clone());
                    }
                    result.entries.extend(found);
                    continue;
                }
            }

            let Some((manifest, content)) = self.read_manifest(&package_dir)? else {
                result.unresolved.push(name.clone());
                continue;
            };
            match rules.extract_version(name, &content) {
                Some(extracted) => {
                    if extracted.strategy == MatchStrategy::Generic {
                        self.progress_reporter.report(&format!(
                            "ℹ️  {}: version {} taken from a generic pattern",
                            name, extracted.version
                        ));
                    }
                    result.entries.push(DiscoveredEntry {
                        name: name.clone(),
                        version: extracted.version,
                        origin: EntryOrigin::Manifest,
                        file_path: manifest,
                    });
                }
                None => result.unresolved.push(name.clone()),
            }
        }

        Ok(result)
    }

    fn scan_meta_package(
        &self,
        meta: &MetaPackage,
        package_dir: &Path,
    ) -> Result<Vec<DiscoveredEntry>> {
        let origin = EntryOrigin::MetaPackage(meta.name.clone());
        let mut entries = Vec::new();

        match &meta.kind {
            MetaPackageKind::Requirements { files } => {
                for file in files {
                    let path = package_dir.join(file);
                    let Some(content) = self.sources.read_optional(&path)? else {
                        continue;
                    };
                    entries.extend(parse_exact_pins(&content).into_iter().map(
                        |(name, version)| DiscoveredEntry {
                            name,
                            version,
                            origin: origin.clone(),
                            file_path: path.clone(),
                        },
                    ));
                }
            }
            MetaPackageKind::SourceTarballs => {
                if let Some((manifest, content)) = self.read_manifest(package_dir)? {
                    entries.extend(parse_source_tarballs(&content).into_iter().map(
                        |(name, version)| DiscoveredEntry {
                            name,
                            version,
                            origin: origin.clone(),
                            file_path: manifest.clone(),
                        },
                    ));
                }
            }
        }

        Ok(entries)
    }

    fn read_manifest(&self, package_dir: &Path) -> Result<Option<(PathBuf, String)>> {
        for candidate in manifest_candidates(package_dir) {
            if !self.sources.is_file(&candidate) {
                continue;
            }
            if let Some(content) = self.sources.read_optional(&candidate)? {
                return Ok(Some((candidate, content)));
            }
        }
        Ok(None)
    }

    fn promote_interpreter(&self, promotion: &InterpreterPromotion) -> Result<()> {
        let Some(source) = self.sources.read_optional(&promotion.from)? else {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Interpreter side file not found: {}",
                promotion.from.display()
            ));
            return Ok(());
        };
        let target = self.sources.read_optional(&promotion.to)?.unwrap_or_default();

        if let Some(line) = interpreter_entry(&source, &target) {
            self.sources.append_lines(&promotion.to, &[line.clone()])?;
            self.progress_reporter.report(&format!(
                "🐍 Added \"{}\" to {}",
                line,
                promotion.to.display()
            ));
        }
        Ok(())
    }

    /// Reads a list file whose records are tagged with the file's own path.
    fn read_list_file(
        &self,
        path: &Path,
        description: &str,
        parse: fn(&str, &str) -> Vec<Dependency>,
    ) -> Result<Vec<Dependency>> {
        match self.sources.read_optional(path)? {
            Some(content) => {
                let source = path.display().to_string();
                Ok(parse(&content, &source)
                    .into_iter()
                    .map(|d| d.with_file_path(path))
                    .collect())
            }
            None => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: {} not found: {}",
                    capitalize(description),
                    path.display()
                ));
                Ok(Vec::new())
            }
        }
    }

    fn scan_tree(&self, tree: &TreeScan) -> Result<Vec<Dependency>> {
        if !self.sources.is_dir(&tree.root) {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Source tree not found: {}",
                tree.root.display()
            ));
            return Ok(Vec::new());
        }

        self.progress_reporter
            .report(&format!("🔍 Scanning source tree: {}", tree.root.display()));
        let mut records = Vec::new();

        if tree.find_package {
            for path in self.sources.find_files(&tree.root, MANIFEST_FILE_NAME)? {
                let Some(content) = self.sources.read_optional(&path)? else {
                    continue;
                };
                let relative = relative_to(&path, &tree.root);
                records.extend(
                    parse_find_package_calls(&content)
                        .into_iter()
                        .filter_map(|(name, version)| {
                            Dependency::new(name, version, MANIFEST_FILE_NAME).ok()
                        })
                        .map(|d| d.with_file_path(&relative)),
                );
            }
        }

        if tree.requirements {
            for path in self.sources.find_files(&tree.root, TREE_REQUIREMENTS_FILE)? {
                let Some(content) = self.sources.read_optional(&path)? else {
                    continue;
                };
                let relative = relative_to(&path, &tree.root);
                records.extend(
                    parse_pinned_requirements(&content, TREE_REQUIREMENTS_FILE)
                        .into_iter()
                        .map(|d| d.with_file_path(&relative)),
                );
            }
        }

        Ok(records)
    }

    fn report_summary(&self, dependencies: &DependencySet) {
        for (source, count) in dependencies.source_counts() {
            self.progress_reporter
                .report(&format!("   {}: {} dependencies", source, count));
        }
        self.progress_reporter.report_completion(&format!(
            "Collected {} unique dependencies",
            dependencies.len()
        ));
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
