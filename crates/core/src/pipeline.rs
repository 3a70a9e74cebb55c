use crate::binding::RbacBinding;
use crate::classifier::{classify, Classification};
use crate::filter::is_federated_binding;
use crate::manifest::{self, OutputFormat};
use crate::rewriter::rewrite_all;
use crate::rules::RuleSet;
use anyhow::Context;
use cluster::BindingSource;
use std::io::{Read, Write};
use tracing::{debug, info};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FindSummary {
    pub pages: usize,
    pub scanned: usize,
    pub retained: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub bindings: usize,
    pub users: usize,
    pub groups: usize,
    pub unchanged: usize,
}

/// Enumerates every binding the source yields, page by page, and keeps those
/// referring to federated identities. A failing page aborts the whole listing.
pub async fn find_federated<B, S>(
    source: &S,
    rules: &RuleSet,
    page_size: u32,
) -> anyhow::Result<(Vec<B>, FindSummary)>
where
    B: RbacBinding,
    S: BindingSource<B> + ?Sized,
{
    let mut summary = FindSummary::default();
    let mut federated = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = source
            .list_page(token.as_deref(), page_size)
            .await
            .with_context(|| format!("listing {}", source.kind()))?;
        summary.pages += 1;
        summary.scanned += page.items.len();
        debug!(page = summary.pages, items = page.items.len(), "fetched page");

        federated.extend(
            page.items
                .into_iter()
                .filter(|b| is_federated_binding(b, rules)),
        );

        // An empty token would restart the listing from the beginning.
        match page.continue_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    summary.retained = federated.len();
    info!(
        kind = source.kind(),
        pages = summary.pages,
        scanned = summary.scanned,
        retained = summary.retained,
        "find complete"
    );
    Ok((federated, summary))
}

/// Find pipeline end to end: enumerate, filter, and write the retained
/// bindings as a single list document.
pub async fn find_and_write<B, S, W>(
    source: &S,
    rules: &RuleSet,
    page_size: u32,
    writer: W,
    format: OutputFormat,
) -> anyhow::Result<FindSummary>
where
    B: RbacBinding,
    S: BindingSource<B> + ?Sized,
    W: Write,
{
    let (federated, summary) = find_federated(source, rules, page_size).await?;
    manifest::write_binding_list(writer, &federated, format)
        .with_context(|| format!("writing federated {}s", B::KIND))?;
    Ok(summary)
}

/// Rewrite pipeline: read a list document, migrate every binding, and write
/// the result as a list document of the same kind.
pub fn rewrite<B, R, W>(
    reader: R,
    writer: W,
    rules: &RuleSet,
    format: OutputFormat,
) -> anyhow::Result<RewriteSummary>
where
    B: RbacBinding,
    R: Read,
    W: Write,
{
    let input: Vec<B> = manifest::read_binding_list(reader)
        .with_context(|| format!("reading {}", B::LIST_KIND))?;

    let mut summary = RewriteSummary {
        bindings: input.len(),
        ..RewriteSummary::default()
    };
    for subject in input.iter().flat_map(|b| b.subjects().unwrap_or_default()) {
        match classify(subject, rules) {
            Classification::User(_) => summary.users += 1,
            Classification::Group(_) => summary.groups += 1,
            Classification::Unrecognized => summary.unchanged += 1,
        }
    }

    let output = rewrite_all(&input, rules);
    manifest::write_binding_list(writer, &output, format)
        .with_context(|| format!("writing rewritten {}s", B::KIND))?;

    info!(
        kind = B::KIND,
        bindings = summary.bindings,
        users = summary.users,
        groups = summary.groups,
        unchanged = summary.unchanged,
        "rewrite complete"
    );
    Ok(summary)
}
