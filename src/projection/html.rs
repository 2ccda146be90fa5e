//! Standalone HTML page rendering a projection with vis-network.

use serde_json::json;

use super::Projection;

const VIS_NETWORK_URL: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Render `projection` as a self-contained HTML document.
///
/// An empty projection renders the "no data" notice instead of a canvas.
pub fn render_page(projection: &Projection, title: &str) -> String {
    let title = escape_html(title);
    if projection.is_empty() {
        return format!(
            "<!DOCTYPE html>\n<html lang=\"uk\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body><p>Спочатку додайте файл онтології</p></body>\n</html>\n"
        );
    }

    let nodes: Vec<_> = projection
        .nodes
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "label": n.label,
                "group": n.group.as_str(),
                "shape": "box",
                "widthConstraint": { "minimum": 150 },
            })
        })
        .collect();
    let edges: Vec<_> = projection
        .edges
        .iter()
        .map(|e| {
            json!({
                "from": e.from,
                "to": e.to,
                "label": e.label,
                "arrows": "to",
                "color": e.color,
            })
        })
        .collect();

    let data = script_safe(&json!({ "nodes": nodes, "edges": edges }).to_string());
    let options = script_safe(&network_options().to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="uk">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{VIS_NETWORK_URL}"></script>
<style>
  html, body {{ margin: 0; height: 100%; }}
  #graph {{ width: 100%; height: 100%; min-height: 800px; border: 1px solid lightgray; }}
</style>
</head>
<body>
<div id="graph"></div>
<script>
  const data = {data};
  const options = {options};
  new vis.Network(
    document.getElementById("graph"),
    {{ nodes: new vis.DataSet(data.nodes), edges: new vis.DataSet(data.edges) }},
    options
  );
</script>
</body>
</html>
"#
    )
}

fn network_options() -> serde_json::Value {
    json!({
        "nodes": { "shape": "box", "font": { "align": "left" } },
        "edges": {
            "smooth": false,
            "arrows": { "to": { "enabled": true, "type": "arrow", "scaleFactor": 1 } },
            "color": { "color": "#848484", "inherit": false },
            "font": { "align": "middle" },
        },
        "groups": {
            "class": { "color": { "background": "#FFD700", "border": "#000" }, "shape": "box" },
            "individual": { "color": { "background": "#7BE141", "border": "#000" }, "shape": "ellipse" },
            "property": { "color": { "background": "#6E6EFD", "border": "#000" }, "shape": "diamond" },
            "blankNode": { "color": { "background": "#AAAAAA", "border": "#000" }, "shape": "circle" },
        },
        "layout": { "improvedLayout": true },
        "physics": {
            "enabled": true,
            "stabilization": { "enabled": true, "iterations": 1000, "updateInterval": 25 },
            "solver": "repulsion",
            "repulsion": {
                "nodeDistance": 100,
                "centralGravity": 0.02,
                "springLength": 200,
                "springConstant": 0.05,
                "damping": 0.09,
            },
            "minVelocity": 0.75,
            "timestep": 0.5,
        },
        "interaction": {
            "dragNodes": true,
            "dragView": true,
            "zoomView": true,
            "navigationButtons": true,
            "keyboard": true,
        },
    })
}

/// JSON embedded in a `<script>` must not close the element or open an
/// HTML comment. `<` only occurs inside JSON strings, where `\u003c` is equivalent.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{NodeGroup, VisualEdge, VisualNode};

    fn sample() -> Projection {
        Projection {
            nodes: vec![
                VisualNode {
                    id: "http://example.org/#Cat".into(),
                    label: "Cat</script>".into(),
                    group: NodeGroup::Class,
                    datatype_properties: Default::default(),
                },
                VisualNode {
                    id: "http://example.org/#Tom".into(),
                    label: "Tom".into(),
                    group: NodeGroup::Individual,
                    datatype_properties: Default::default(),
                },
            ],
            edges: vec![VisualEdge {
                from: "http://example.org/#Tom".into(),
                to: "http://example.org/#Cat".into(),
                label: "likes".into(),
                color: "#848484".into(),
            }],
        }
    }

    #[test]
    fn page_embeds_nodes_edges_and_groups() {
        let page = render_page(&sample(), "Zoo");
        assert!(page.contains("<title>Zoo</title>"));
        assert!(page.contains("\"group\":\"class\""));
        assert!(page.contains("\"arrows\":\"to\""));
        assert!(page.contains("\"blankNode\""));
        assert!(page.contains(VIS_NETWORK_URL));
    }

    #[test]
    fn embedded_labels_cannot_close_the_script() {
        let page = render_page(&sample(), "Zoo");
        assert!(!page.contains("Cat</script>"));
        assert!(page.contains("Cat\\u003c/script>"));
    }

    #[test]
    fn embedded_labels_cannot_open_a_comment() {
        let mut projection = sample();
        projection.nodes[1].label = "<!--Tom".into();
        let page = render_page(&projection, "Zoo");
        assert!(!page.contains("<!--Tom"));
        assert!(page.contains("\\u003c!--Tom"));

        // The escaped JSON still decodes to the original label.
        let decoded: serde_json::Value = serde_json::from_str("\"\\u003c!--Tom\"").unwrap();
        assert_eq!(decoded, "<!--Tom");
    }

    #[test]
    fn empty_projection_renders_notice() {
        let page = render_page(&Projection::default(), "<empty>");
        assert!(page.contains("&lt;empty&gt;"));
        assert!(!page.contains("vis.Network"));
    }
}
