use std::path::Path;

use futures::future::join_all;

use crate::assets::discovery::{discover_images, filter_originals};
use crate::models::portfolio::{EnrichedPortfolio, EnrichedProject, Portfolio, Project};

/// Derives each project's image list from its asset folder.
///
/// `images` becomes the filtered originals, `allImages` the raw scan and
/// `originalImages` whatever the stored document listed. Projects without an
/// image folder pass through unchanged. Folders are scanned concurrently;
/// output order matches input order.
pub async fn enrich_projects(projects: Vec<Project>, assets_root: &Path) -> Vec<EnrichedProject> {
    join_all(
        projects
            .into_iter()
            .map(|project| enrich_project(project, assets_root)),
    )
    .await
}

async fn enrich_project(mut project: Project, assets_root: &Path) -> EnrichedProject {
    let Some(folder) = project.image_folder().map(str::to_string) else {
        return EnrichedProject::passthrough(project);
    };

    let discovered = discover_images(assets_root, &folder).await;
    let stored = project.images.take().unwrap_or_default();
    project.images = Some(filter_originals(&discovered));

    EnrichedProject {
        project,
        all_images: Some(discovered),
        original_images: Some(stored),
    }
}

pub async fn enrich_portfolio(portfolio: Portfolio, assets_root: &Path) -> EnrichedPortfolio {
    let mut portfolio = portfolio;
    let projects = std::mem::take(&mut portfolio.projects);
    let enriched = enrich_projects(projects, assets_root).await;
    portfolio.with_projects(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::sample_portfolio;

    #[tokio::test]
    async fn test_enrich_attaches_filtered_and_raw_lists() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("raytracer");
        std::fs::create_dir(&folder).unwrap();
        for name in ["render.png", "render.webp", "render_small.jpg"] {
            std::fs::write(folder.join(name), b"x").unwrap();
        }

        let enriched = enrich_portfolio(sample_portfolio(), dir.path()).await;
        let raytracer = &enriched.projects[0];
        assert_eq!(
            raytracer.project.images.as_deref(),
            Some(&["render.png".to_string()][..])
        );
        assert_eq!(raytracer.all_images.as_ref().unwrap().len(), 3);
        assert_eq!(
            raytracer.original_images.as_deref(),
            Some(&["legacy.png".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_project_without_folder_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = sample_portfolio();
        let cli = portfolio.projects[1].clone();

        let enriched = enrich_portfolio(portfolio, dir.path()).await;
        assert_eq!(enriched.projects[1], EnrichedProject::passthrough(cli));
    }

    #[tokio::test]
    async fn test_missing_folder_yields_empty_images() {
        let dir = tempfile::tempdir().unwrap();
        let enriched = enrich_portfolio(sample_portfolio(), dir.path()).await;
        let raytracer = &enriched.projects[0];
        assert_eq!(raytracer.project.images, Some(vec![]));
        assert_eq!(raytracer.all_images, Some(vec![]));
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = sample_portfolio();
        let ids: Vec<_> = portfolio.projects.iter().map(|p| p.id.clone()).collect();
        let enriched = enrich_portfolio(portfolio, dir.path()).await;
        let enriched_ids: Vec<_> = enriched.projects.iter().map(|p| p.project.id.clone()).collect();
        assert_eq!(ids, enriched_ids);
    }
}
