/// Builds the single instruction sent to the text model for `product_name`.
///
/// The model is asked for exactly two short marketplace-style descriptions
/// in the "[spec/technology] — [buyer benefit]" shape, returned as a bare JSON
/// array of two strings.
pub fn build_prompt(product_name: &str) -> String {
    format!(
        "You are an e-commerce copywriter who specializes in Amazon and eBay listings. \
For the product: \"{name}\", write 2 short descriptions (1-2 sentences each) in the exact \
Amazon/eBay style: open with a strong technical claim, name the key technology or \
specification (driver size, codec, battery life, microphone count, materials, wattage, etc.) \
and then translate it into the concrete benefit for the buyer. Use structures like \
\"[Technology/Specification] — [direct benefit]\". Never use poetic language, metaphors or \
empty phrases such as \"elevate your experience\", \"immerse yourself\" or \"oasis\". Be direct, \
technical and focused on real value. If you do not know the product's exact specifications, \
infer realistic values that are representative of this kind of product. Return STRICTLY a \
JSON array of 2 strings, with no markdown and no explanations.",
        name = product_name.trim()
    )
}
