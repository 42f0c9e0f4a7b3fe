//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when no `.pmt` override is
//! found. Rendered with Handlebars; see `PromptContext` for the variables.

/// System message for the query strategist
pub const STRATEGIST_SYSTEM: &str = "You are a helpful travel research assistant.";

/// User prompt for the query strategist
pub const STRATEGIST: &str = r#"You are a travel research assistant. Based on the following travel request, write ONE effective search query to find the most important real-time information for this specific trip.

Travel Details:
- Destination: {{destination}}
- Travel Date: {{month_year}}
- Duration: {{duration_days}} days
- Budget: {{budget}}
- Travel Group: {{group}}

Focus your search on finding current information about:
- Weather conditions during the travel period
- Special events or festivals happening during that time
- Current travel advisories or important updates
- Seasonal pricing or deals

Output ONLY the search query string, nothing else."#;

/// System message for the itinerary planner
pub const PLANNER_SYSTEM: &str = "You are an experienced travel planner who creates detailed, practical itineraries.";

/// User prompt for the itinerary planner
pub const PLANNER: &str = r#"You are an expert travel planner. Create a comprehensive and detailed travel itinerary based on the following information.

**User's Travel Request:**
- Destination: {{destination}}
- Travel Date: {{full_date}}
- Duration: {{duration_days}} days
- Budget Level: {{budget}}
- Travel Group: {{group}}

**Real-Time Information:**
{{search_data}}

**Instructions:**
Generate a complete travel itinerary in Markdown format with EXACTLY these sections:

# Trip to {{destination}}

## 1. Trip Overview
- **Transportation**: Best ways to reach {{destination}} (flights, trains, etc.) and estimated costs
- **Local Currency**: Currency name, current exchange rate tips, and best places to exchange money
- **Language**: Main language(s) spoken and 2-3 essential phrases (Hello, Thank you, How much?, etc.)
- **Best Time to Visit**: Brief note on weather during the travel period

## 2. Accommodation Recommendations
Based on the {{budget}} budget, suggest 2-3 specific areas or types of hotels/accommodations:
- Include area names and why they're good choices
- Estimated price range per night
- Proximity to main attractions

## 3. Daily Itinerary
Create a day-by-day breakdown for all {{duration_days}} days:

**Day 1: [Theme/Focus]**
- **Morning**: Specific activity or location with timing
- **Afternoon**: Specific activity or location with timing
- **Evening**: Specific activity or location with timing
- **Dining Suggestion**: Restaurant type or area for meals

[Repeat for each day, mixing tourist spots and hidden gems]

## 4. Budget Breakdown
Provide estimated costs in local currency and USD:
- **Accommodation**: Cost per night × {{duration_days}} nights
- **Food**: Daily budget for breakfast, lunch, dinner
- **Transportation**: Local transport, airport transfers
- **Activities**: Entry fees, tours, experiences
- **Total Estimated Cost**: Sum with buffer

## 5. Packing & Safety Tips
- **Weather-Appropriate Clothing**: What to pack based on the season
- **Tourist Trap Alerts**: 2-3 common scams or overpriced tourist traps to avoid
- **Safety Tips**: Local emergency numbers, safe areas, health precautions
- **Essential Items**: Must-have items for this specific destination

Make the itinerary practical, specific, and tailored to the {{group}} group traveling on a {{budget}} budget. Include local insights and insider tips where possible."#;

/// Look up an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "strategist" => Some(STRATEGIST),
        "strategist-system" => Some(STRATEGIST_SYSTEM),
        "planner" => Some(PLANNER),
        "planner-system" => Some(PLANNER_SYSTEM),
        _ => None,
    }
}
