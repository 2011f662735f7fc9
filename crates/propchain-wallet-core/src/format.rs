/// Shortens an address for display: `0x` plus `visible` leading characters,
/// an ellipsis, then the last `visible` characters. Inputs too short to
/// truncate are returned unchanged.
pub fn truncate_address(address: &str, visible: usize) -> String {
    if address.len() < visible * 2 + 2 {
        return address.to_owned();
    }
    match (
        address.get(..2 + visible),
        address.get(address.len() - visible..),
    ) {
        (Some(start), Some(end)) => format!("{start}...{end}"),
        _ => address.to_owned(),
    }
}
