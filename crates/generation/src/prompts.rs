use crate::models::AspectRatio;

pub const PREPARE_IMAGE_PROMPT: &str = "Enhance the quality of this image, remove all imperfections and blemishes, and make the background transparent. Keep only the main product, perfectly isolated. The output must be a PNG with a transparent background. Do not change the product itself.";

pub fn ad_prompt(scene: &str, aspect: AspectRatio) -> String {
    format!(
        "Using the provided product image (which has a transparent background), create a stunning, photorealistic CGI advertisement. Place the product in the following scene: \"{scene}\". The final image should be high-impact with professional, dramatic lighting and shadows that match the scene. The final image must have an aspect ratio of {aspect}."
    )
}

pub fn video_prompt(scene: &str) -> String {
    format!(
        "You are a professional film director and sound designer. Based on the provided CGI ad image and the original concept (\"{scene}\"), create a comprehensive text-to-video prompt for a 3-5 second, high-impact animation. The prompt must be a single, detailed paragraph that includes three key elements: **Visuals:** Describe a dynamic camera movement (e.g., a slow, dramatic dolly zoom; a sweeping drone shot). Detail any visual effects (VFX) like atmospheric particles, lens flares, or light interactions. **Action:** Briefly describe what happens in the scene. **Sound Design:** Describe the complete audio experience. Include ambient environmental sounds (e.g., 'the faint hum of city traffic,' 'gentle waves crashing on a shore'), specific sound effects (SFX) that sync with the product's action (e.g., 'a deep, resonant metallic clang,' 'a satisfying, crisp liquid splash'), and a suggestion for the musical score (e.g., 'an epic, swelling orchestral track,' 'a modern, minimalist and cool synth beat')."
    )
}

pub fn random_scene_prompt() -> &'static str {
    "You are an award-winning creative director, famous for creating viral \"Faux Out of Home\" CGI ads. Your goal is to generate a single, breathtaking, and hyper-realistic scene for the provided product. First, analyze the provided product image to understand its category (e.g., cosmetics, beverage, apparel, technology) and target audience. Then, generate a concept that is thematically relevant and visually stunning. The concept must be cinematic and dynamic, placing a gigantic version of the product into a real-world location in a surreal and awe-inspiring way. For example, if it's a makeup product, think of scenes involving beautiful natural elements like flowers, waterfalls colored by the product, or elegant architecture. If it's a beverage, think of refreshing scenes like pouring into a landmark or creating a splash in a cityscape. The output must be a single, compelling paragraph ready for a CGI artist."
}
