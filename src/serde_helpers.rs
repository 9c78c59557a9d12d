use crate::common::{Node, NodeKind};

// Nodes are stored as a flat "x y k" string: c = sharp, s = smooth, o = off-curve
pub(crate) fn serialize_nodes<S>(nodes: &Vec<Node>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut s = String::new();
    for node in nodes {
        s.push_str(&format!(
            "{} {} {} ",
            node.x,
            node.y,
            match node.kind {
                NodeKind::OnCurveSharp => "c",
                NodeKind::OnCurveSmooth => "s",
                NodeKind::OffCurve => "o",
            }
        ));
    }
    s.pop(); // Remove trailing space
    serializer.serialize_str(&s)
}

pub(crate) fn deserialize_nodes<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    let mut nodes = Vec::new();
    let mut tokens = s.split_whitespace();
    while let Some(token) = tokens.next() {
        let x_str = token;
        let y_str = tokens
            .next()
            .ok_or_else(|| serde::de::Error::custom("Expected y coordinate"))?;
        let kind_str = tokens
            .next()
            .ok_or_else(|| serde::de::Error::custom("Expected node kind"))?;
        let x: f64 = x_str
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid x coordinate: {}", x_str)))?;
        let y: f64 = y_str
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid y coordinate: {}", y_str)))?;
        let kind = match kind_str {
            "c" => NodeKind::OnCurveSharp,
            "s" => NodeKind::OnCurveSmooth,
            "o" => NodeKind::OffCurve,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "Invalid node kind: {}",
                    kind_str
                )))
            }
        };
        nodes.push(Node { x, y, kind });
    }
    Ok(nodes)
}
