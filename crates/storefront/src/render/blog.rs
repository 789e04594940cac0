//! Journal (blog) renderer.

use acumen_core::{Cart, PostSlug};
use askama::Template;

use super::{Fragment, LayoutView, PostCard, RenderError, not_found};
use crate::catalog::Catalog;
use crate::filters;

#[derive(Template)]
#[template(path = "pages/blog.html")]
struct BlogIndexTemplate {
    title: String,
    layout: LayoutView,
    posts: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "pages/blog_post.html")]
struct BlogPostTemplate {
    title: String,
    layout: LayoutView,
    post: PostCard,
    more: Vec<PostCard>,
}

/// Render the journal index, or a single entry when `slug` is given.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn blog(
    catalog: &Catalog,
    cart: &Cart,
    slug: Option<&PostSlug>,
) -> Result<Fragment, RenderError> {
    let layout = LayoutView::new(catalog, cart);

    let Some(slug) = slug else {
        let template = BlogIndexTemplate {
            title: "Journal".to_string(),
            layout,
            posts: catalog.posts().iter().map(PostCard::from).collect(),
        };
        return Ok(Fragment::found(
            template.title.clone(),
            template.render()?,
            Vec::new(),
        ));
    };

    let Some(post) = catalog.find_post(slug) else {
        return not_found(
            layout,
            "Article not found",
            "That journal entry doesn't exist or has been archived.",
            "/blog.html",
            "Back to the journal",
        );
    };

    let template = BlogPostTemplate {
        title: post.title.clone(),
        layout,
        post: PostCard::from(post),
        more: catalog
            .posts()
            .iter()
            .filter(|other| &other.slug != slug)
            .map(PostCard::from)
            .collect(),
    };

    Ok(Fragment::found(
        template.title.clone(),
        template.render()?,
        Vec::new(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_index_lists_posts() {
        let catalog = Catalog::builtin().unwrap();
        let fragment = blog(&catalog, &Cart::new(), None).unwrap();

        assert!(fragment.html.contains("Material Science Behind Titanium Watches"));
        assert!(fragment.html.contains("Liam Archer"));
        assert!(fragment.html.contains("6 min read"));
    }

    #[test]
    fn test_single_post() {
        let catalog = Catalog::builtin().unwrap();
        let slug = PostSlug::new("material-science");
        let fragment = blog(&catalog, &Cart::new(), Some(&slug)).unwrap();

        assert_eq!(fragment.title, "Material Science Behind Titanium Watches");
        assert!(fragment.html.contains("August 15, 2025"));
    }

    #[test]
    fn test_unknown_post_is_not_found() {
        let catalog = Catalog::builtin().unwrap();
        let slug = PostSlug::new("missing");
        let fragment = blog(&catalog, &Cart::new(), Some(&slug)).unwrap();
        assert!(fragment.is_not_found());
    }
}
